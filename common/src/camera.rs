//! カメラ取得の段階とUI表示

/// 取得を試みるカメラ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraFacing {
    /// 背面カメラ（`facingMode: "environment"`）
    Environment,
    /// 任意のカメラ（`video: true`）
    Any,
}

impl CameraFacing {
    /// 試行順。2回失敗したらファイルアップロードに切り替える
    pub const ACQUISITION_ORDER: [CameraFacing; 2] = [CameraFacing::Environment, CameraFacing::Any];

    /// `facingMode` 制約。`None` なら制約なし
    pub fn facing_mode(&self) -> Option<&'static str> {
        match self {
            CameraFacing::Environment => Some("environment"),
            CameraFacing::Any => None,
        }
    }

    pub fn affordance(&self) -> CameraAffordance {
        match self {
            CameraFacing::Environment => CameraAffordance::RearCamera,
            CameraFacing::Any => CameraAffordance::FrontCamera,
        }
    }
}

/// スキャン画面に表示する要素（常にいずれか1つ）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraAffordance {
    RearCamera,
    FrontCamera,
    UploadFallback,
}

impl CameraAffordance {
    pub fn label(&self) -> &'static str {
        match self {
            CameraAffordance::RearCamera => "Rear camera",
            CameraAffordance::FrontCamera => "Front camera",
            CameraAffordance::UploadFallback => {
                "Camera not available. Please upload a photo instead."
            }
        }
    }

    pub fn shows_video(&self) -> bool {
        !matches!(self, CameraAffordance::UploadFallback)
    }
}

/// カメラの状態
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CameraState {
    #[default]
    Idle,
    Requesting,
    Live(CameraFacing),
    Unavailable(String),
}

impl CameraState {
    /// 取得が完了（成功/失敗）していれば表示要素を返す
    pub fn affordance(&self) -> Option<CameraAffordance> {
        match self {
            CameraState::Live(facing) => Some(facing.affordance()),
            CameraState::Unavailable(_) => Some(CameraAffordance::UploadFallback),
            CameraState::Idle | CameraState::Requesting => None,
        }
    }
}
