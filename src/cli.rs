use clap::{Parser, Subcommand};
use food_scan_common::AnalyzeRoute;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "food-scan")]
#[command(about = "食品パッケージのOCR・栄養判定クライアント", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// ログインしてセッションを保存
    Login {
        /// ユーザ名（省略時は入力を求める）
        #[arg(short, long)]
        username: Option<String>,
    },

    /// ユーザ登録してログイン
    Register {
        #[arg(short, long)]
        username: Option<String>,
    },

    /// ログアウト
    Logout,

    /// 画像を解析して判定を表示
    Analyze {
        /// 画像ファイル
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// 再エンコードせずにそのまま送信
        #[arg(long)]
        raw: bool,

        /// 解析エンドポイント (analyze/upload)
        #[arg(short, long)]
        endpoint: Option<AnalyzeRoute>,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// フォルダ内の画像をまとめて解析
    Scan {
        /// 画像フォルダのパス
        #[arg(required = true)]
        folder: PathBuf,

        /// 出力JSONファイル（デフォルト: 入力フォルダ/scan-result.json）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 再エンコードせずにそのまま送信
        #[arg(long)]
        raw: bool,

        /// キャッシュを使用（解析済み画像をスキップ）
        #[arg(long)]
        use_cache: bool,
    },

    /// スキャン履歴を表示
    History {
        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 履歴の画像をダウンロードして共有文を表示
    Share {
        /// 履歴のファイル名
        #[arg(required = true)]
        filename: String,

        /// 保存先ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 栄養アシスタントと会話
    Chat {
        /// 最初に質問する話題
        #[arg(short, long)]
        topic: Option<String>,
    },

    /// 設定を管理
    Config {
        /// サーバURLを設定
        #[arg(long)]
        server: Option<String>,

        /// 解析エンドポイントを設定 (analyze/upload)
        #[arg(long)]
        endpoint: Option<AnalyzeRoute>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },

    /// キャッシュ管理
    Cache {
        /// キャッシュをクリア
        #[arg(long)]
        clear: bool,

        /// 対象フォルダ（デフォルト: カレントディレクトリ）
        #[arg(short, long)]
        folder: Option<PathBuf>,

        /// キャッシュ情報を表示
        #[arg(long)]
        info: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze_with_endpoint() {
        let cli = Cli::try_parse_from([
            "food-scan", "analyze", "a.jpg", "b.png", "--endpoint", "upload", "--json",
        ])
        .expect("引数解析失敗");

        match cli.command {
            Commands::Analyze { files, endpoint, json, raw } => {
                assert_eq!(files.len(), 2);
                assert_eq!(endpoint, Some(AnalyzeRoute::Upload));
                assert!(json);
                assert!(!raw);
            }
            _ => panic!("analyze として解析されるべき"),
        }
    }

    #[test]
    fn test_analyze_requires_files() {
        assert!(Cli::try_parse_from(["food-scan", "analyze"]).is_err());
    }

    #[test]
    fn test_unknown_endpoint_rejected() {
        assert!(Cli::try_parse_from(["food-scan", "analyze", "a.jpg", "--endpoint", "ocr"]).is_err());
    }

    #[test]
    fn test_global_verbose_after_subcommand() {
        let cli = Cli::try_parse_from(["food-scan", "history", "-v"]).expect("引数解析失敗");
        assert!(cli.verbose);
    }
}
