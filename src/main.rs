use clap::Parser;
use dialoguer::{Input, Password};
use food_scan::{cache, chat, cli, client, config, error, image_prep, report, scanner, share};
use cli::{Cli, Commands};
use client::FoodScanClient;
use config::Config;
use error::{FoodScanError, Result};
use food_scan_common::ScanRecord;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load()?;
    tracing::debug!(server = %config.server_url(), "設定を読み込みました");

    match cli.command {
        Commands::Login { username } => {
            let username = prompt_username(username)?;
            let password = Password::new().with_prompt("パスワード").interact()?;

            let mut client = FoodScanClient::new(&config)?;
            let session = client.login(&username, &password).await?;
            config.session_cookie = Some(session);
            config.save()?;
            println!("✔ {} としてログインしました", username);
        }

        Commands::Register { username } => {
            let username = prompt_username(username)?;
            let password = Password::new()
                .with_prompt("パスワード")
                .with_confirmation("パスワード（確認）", "パスワードが一致しません")
                .interact()?;

            let mut client = FoodScanClient::new(&config)?;
            let session = client.register(&username, &password).await?;
            config.session_cookie = Some(session);
            config.save()?;
            println!("✔ {} を登録しました", username);
        }

        Commands::Logout => {
            let mut client = FoodScanClient::new(&config)?;
            if let Err(e) = client.logout().await {
                tracing::warn!(error = %e, "サーバへのログアウト通知に失敗しました");
            }
            config.session_cookie = None;
            config.save()?;
            println!("✔ ログアウトしました");
        }

        Commands::Analyze { files, raw, endpoint, json } => {
            if let Some(route) = endpoint {
                config.analyze_route = route;
            }
            let client = logged_in_client(&config)?;

            let mut records = Vec::with_capacity(files.len());
            for path in &files {
                let record = analyze_file(&client, path, raw).await?;
                if !json {
                    println!("📸 {}\n", path.display());
                    println!("{}", report::format_record(&record));
                }
                records.push(record);
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            }
        }

        Commands::Scan { folder, output, raw, use_cache } => {
            println!("🍎 food-scan - フォルダ解析\n");
            let client = logged_in_client(&config)?;

            // 1. 画像スキャン
            println!("[1/3] 画像をスキャン中...");
            let images = scanner::scan_folder(&folder)?;
            if images.is_empty() {
                return Err(FoodScanError::NoImagesFound(folder.display().to_string()));
            }
            println!("✔ {}枚の画像を検出\n", images.len());

            // 2. 解析
            println!("[2/3] 解析中...{}", if use_cache { " (キャッシュ有効)" } else { "" });
            let mut cache_file = if use_cache {
                cache::CacheFile::load(&folder)
            } else {
                cache::CacheFile::default()
            };
            let (mut results, pending) = if use_cache {
                cache::filter_cached_images(&images, &cache_file)
            } else {
                (vec![None; images.len()], (0..images.len()).map(|i| (i, String::new())).collect())
            };
            if use_cache {
                println!("  キャッシュ済み: {}枚", images.len() - pending.len());
            }

            let progress = progress_bar(pending.len() as u64);
            let mut failures = 0usize;
            for (index, hash) in pending {
                let image = &images[index];
                progress.set_message(image.file_name.clone());

                match analyze_file(&client, &image.path, raw).await {
                    Ok(record) => {
                        if use_cache && !hash.is_empty() {
                            cache_file.insert(hash, image.file_name.clone(), image.file_size, record.clone());
                        }
                        results[index] = Some(record);
                    }
                    // 未ログインは全件失敗するので打ち切る
                    Err(FoodScanError::NotLoggedIn) => {
                        progress.abandon();
                        return Err(FoodScanError::NotLoggedIn);
                    }
                    Err(e) => {
                        failures += 1;
                        progress.suspend(|| eprintln!("⚠ {}: {}", image.file_name, e));
                    }
                }
                progress.inc(1);
            }
            progress.finish_and_clear();

            if use_cache {
                cache_file.save(&folder)?;
            }
            println!("✔ 解析完了{}\n", if failures > 0 { format!("（失敗 {}件）", failures) } else { String::new() });

            // 3. 結果保存
            println!("[3/3] 結果を保存中...");
            let records: Vec<ScanRecord> = results.into_iter().flatten().collect();
            let output = output.unwrap_or_else(|| folder.join("scan-result.json"));
            std::fs::write(&output, serde_json::to_string_pretty(&records)?)?;
            println!("✔ 結果を保存: {}", output.display());

            println!("\n✅ {}件の解析完了", records.len());
        }

        Commands::History { json } => {
            let client = logged_in_client(&config)?;
            let records = client.history().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                print!("{}", report::format_history(&records));
            }
        }

        Commands::Share { filename, output } => {
            let client = logged_in_client(&config)?;
            let dir = output.unwrap_or_else(|| config.download_dir());
            let shared = share::download_for_share(&client, &filename, &dir).await?;

            println!("✔ 画像を保存: {}", shared.saved_to.display());
            println!("\n{}", shared.payload.title);
            println!("{}", shared.payload.text);
            println!("{}", shared.payload.image_url);
        }

        Commands::Chat { topic } => {
            chat::run_repl(topic.as_deref())?;
        }

        Commands::Config { server, endpoint, show } => {
            let changed = server.is_some() || endpoint.is_some();

            if let Some(url) = server {
                config.set_server_url(&url)?;
                println!("✔ サーバURLを設定しました（再ログインが必要です）");
            }
            if let Some(route) = endpoint {
                config.analyze_route = route;
                println!("✔ 解析エンドポイントを設定しました");
            }
            if changed {
                config.save()?;
            }

            if show || !changed {
                println!("設定:");
                println!("  サーバ: {}", config.server_url());
                println!("  解析エンドポイント: {}", config.analyze_route);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  保存先: {}", config.download_dir().display());
                println!("  ログイン: {}", if config.session().is_some() { "済み" } else { "未" });
            }
        }

        Commands::Cache { clear, folder, info } => {
            let target = folder.unwrap_or_else(|| std::path::PathBuf::from("."));
            let cache_path = cache::CacheFile::cache_path(&target);

            if info || !clear {
                // デフォルトまたは--info: 情報表示
                if cache_path.exists() {
                    let cache_file = cache::CacheFile::load(&target);
                    println!("キャッシュ情報:");
                    println!("  パス: {}", cache_path.display());
                    println!("  件数: {}", cache_file.len());
                    if let Ok(meta) = std::fs::metadata(&cache_path) {
                        println!("  サイズ: {} bytes", meta.len());
                    }
                } else {
                    println!("キャッシュファイルが存在しません: {}", cache_path.display());
                }
            }

            if clear {
                match cache::CacheFile::clear(&target) {
                    Ok(true) => println!("✔ キャッシュを削除しました: {}", cache_path.display()),
                    Ok(false) => println!("キャッシュファイルが存在しません"),
                    Err(e) => println!("キャッシュ削除エラー: {}", e),
                }
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("warn,food_scan=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn prompt_username(username: Option<String>) -> Result<String> {
    match username {
        Some(name) if !name.trim().is_empty() => Ok(name.trim().to_string()),
        _ => Ok(Input::<String>::new().with_prompt("ユーザ名").interact_text()?),
    }
}

fn logged_in_client(config: &Config) -> Result<FoodScanClient> {
    if config.session().is_none() {
        return Err(FoodScanError::NotLoggedIn);
    }
    FoodScanClient::new(config)
}

async fn analyze_file(client: &FoodScanClient, path: &Path, raw: bool) -> Result<ScanRecord> {
    let image = image_prep::prepare(path, raw)?;
    client.analyze(image.bytes, &image.file_name, image.mime).await
}

fn progress_bar(len: u64) -> ProgressBar {
    let bar = ProgressBar::new(len);
    let style = ProgressStyle::with_template("  {bar:30.cyan/blue} {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}
