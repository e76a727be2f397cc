//! 履歴画像のダウンロードと共有文

use crate::client::FoodScanClient;
use crate::error::Result;
use food_scan_common::SharePayload;
use std::path::{Path, PathBuf};

/// 共有の準備結果
#[derive(Debug)]
pub struct SharedFile {
    pub payload: SharePayload,
    pub saved_to: PathBuf,
}

/// 履歴から判定を探し、画像を `dir` に保存する
pub async fn download_for_share(
    client: &FoodScanClient,
    filename: &str,
    dir: &Path,
) -> Result<SharedFile> {
    // 履歴に無い画像でも共有文は作れる
    let verdict = match client.history().await {
        Ok(records) => records
            .into_iter()
            .find(|r| r.filename == filename)
            .map(|r| r.quick_verdict)
            .unwrap_or_default(),
        Err(e) => {
            tracing::debug!(error = %e, "履歴を取得できないため判定なしで共有します");
            String::new()
        }
    };

    let payload = SharePayload::for_history_item(client.endpoints(), filename, &verdict);
    let bytes = client.download(filename).await?;

    std::fs::create_dir_all(dir)?;
    let saved_to = dir.join(safe_file_name(&payload.file_name));
    std::fs::write(&saved_to, bytes)?;

    Ok(SharedFile { payload, saved_to })
}

/// パス区切りを含む名前で保存先の外に書かない
fn safe_file_name(name: &str) -> String {
    let name = name.rsplit(&['/', '\\'][..]).next().unwrap_or(name).trim();
    if name.is_empty() || name == "." || name == ".." {
        food_scan_common::CAPTURE_FILE_NAME.to_string()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_file_name() {
        assert_eq!(safe_file_name("alice_20240501_120000_a.jpg"), "alice_20240501_120000_a.jpg");
        assert_eq!(safe_file_name("../../etc/passwd"), "passwd");
        assert_eq!(safe_file_name("dir\\x.png"), "x.png");
        assert_eq!(safe_file_name(".."), "capture.jpg");
    }
}
