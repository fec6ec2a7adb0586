use chrono::DateTime;
use clap::ArgMatches;
use colored::Colorize;
use sitegraph_core::Database;
use sitegraph_core::crawl::{CrawlOptions, execute_crawl};
use sitegraph_core::report::{ReportFormat, render, save_report};
use sitegraph_crawler::{CancelFlag, CrawlResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use url::Url;

// Helper functions for the crawl handler

/// Parse the seed argument as a URL, trying to add https:// if needed
pub fn parse_seed_url(raw: &str) -> Option<String> {
    // Try to parse as-is
    if let Ok(url) = Url::parse(raw)
        && url.has_host()
    {
        return Some(raw.to_string());
    }

    // Try adding https://
    let with_scheme = format!("https://{}", raw);
    if let Ok(url) = Url::parse(&with_scheme)
        && url.has_host()
    {
        return Some(with_scheme);
    }

    None
}

/// Expand `~` in a database path argument
pub fn expand_database_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

fn emit_report(result: &CrawlResult, format: &ReportFormat, output: Option<&PathBuf>) {
    let rendered = match render(result, format) {
        Ok(rendered) => rendered,
        Err(e) => {
            eprintln!("✗ Failed to render report: {}", e);
            std::process::exit(1);
        }
    };

    match output {
        Some(path) => match save_report(&rendered, path) {
            Ok(()) => println!("{} Report saved to {}", "✓".green().bold(), path.display()),
            Err(e) => {
                eprintln!("✗ Failed to write {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => print!("{}", rendered),
    }
}

fn open_database(path: &Path) -> Database {
    match Database::new(path) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("✗ Failed to open database {}: {}", path.display(), e);
            std::process::exit(1);
        }
    }
}

pub async fn handle_crawl(sub_matches: &ArgMatches, quiet: bool) {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    let raw_url = sub_matches.get_one::<String>("url").unwrap();
    let threads = *sub_matches.get_one::<usize>("threads").unwrap_or(&10);
    let timeout_secs = *sub_matches.get_one::<u64>("timeout").unwrap_or(&10);
    let max_depth = sub_matches.get_one::<usize>("max-depth").copied();
    let max_pages = sub_matches.get_one::<usize>("max-pages").copied();
    let excluded_extensions = sub_matches
        .get_many::<String>("exclude-ext")
        .map(|values| values.cloned().collect::<Vec<_>>());
    let leaf_segment = if sub_matches.get_flag("no-leaf-filter") {
        None
    } else {
        sub_matches.get_one::<String>("leaf-segment").cloned()
    };
    let database = sub_matches.get_one::<String>("database").unwrap();
    let no_save = sub_matches.get_flag("no-save");
    let output = sub_matches.get_one::<PathBuf>("output");
    let format_name = sub_matches.get_one::<String>("format").unwrap();

    let Some(seed) = parse_seed_url(raw_url) else {
        eprintln!("✗ Invalid seed URL '{}'", raw_url);
        std::process::exit(1);
    };

    if !quiet {
        println!("\n🕷️  Crawling {}", seed.bright_white());
        println!("Workers: {}", threads);
        println!("Timeout: {}s", timeout_secs);
        if let Some(depth) = max_depth {
            println!("Max depth: {}", depth);
        }
        if let Some(pages) = max_pages {
            println!("Max pages: {}", pages);
        }
        println!();
    }

    // Ctrl-C flips the shared cancel flag; workers drain and the partial
    // result is still reported and saved.
    let cancel: CancelFlag = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("\nCancelling crawl, letting in-flight requests finish...");
                cancel.store(true, Ordering::SeqCst);
            }
        });
    }

    let started_at = chrono::Utc::now().timestamp();

    let options = CrawlOptions {
        seed,
        threads,
        timeout_secs,
        max_depth,
        max_pages,
        excluded_extensions,
        leaf_segment,
        show_progress_bars: !quiet,
    };

    let result = match execute_crawl(options, cancel).await {
        Ok(result) => result,
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    };

    if !no_save {
        let db_path = expand_database_path(database);
        let mut db = open_database(&db_path);
        match db.save_result(&result, started_at) {
            Ok(session_id) => {
                if !quiet {
                    println!(
                        "{} Session {} saved to {}",
                        "✓".green().bold(),
                        session_id.bright_white(),
                        db_path.display()
                    );
                }
            }
            Err(e) => eprintln!("⚠️  Failed to save session: {}", e),
        }
    }

    let format = ReportFormat::from_str(format_name).unwrap_or(ReportFormat::Text);
    emit_report(&result, &format, output);
}

pub fn handle_export(sub_matches: &ArgMatches) {
    let database = sub_matches.get_one::<String>("database").unwrap();
    let session = sub_matches.get_one::<String>("session");
    let output = sub_matches.get_one::<PathBuf>("output");
    let format_name = sub_matches.get_one::<String>("format").unwrap();

    let db_path = expand_database_path(database);
    if !Database::exists(&db_path) {
        eprintln!("✗ No database at {}", db_path.display());
        std::process::exit(1);
    }
    let db = open_database(&db_path);

    let session_id = match session {
        Some(id) => id.clone(),
        None => match db.latest_session() {
            Ok(Some(id)) => id,
            Ok(None) => {
                eprintln!("✗ No stored sessions in {}", db_path.display());
                std::process::exit(1);
            }
            Err(e) => {
                eprintln!("✗ Failed to query sessions: {}", e);
                std::process::exit(1);
            }
        },
    };

    let result = match db.load_result(&session_id) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("✗ Failed to load session {}: {}", session_id, e);
            std::process::exit(1);
        }
    };

    let format = ReportFormat::from_str(format_name).unwrap_or(ReportFormat::Text);
    emit_report(&result, &format, output);
}

pub fn handle_sessions(sub_matches: &ArgMatches) {
    let database = sub_matches.get_one::<String>("database").unwrap();

    let db_path = expand_database_path(database);
    if !Database::exists(&db_path) {
        eprintln!("✗ No database at {}", db_path.display());
        std::process::exit(1);
    }
    let db = open_database(&db_path);

    let sessions = match db.list_sessions() {
        Ok(sessions) => sessions,
        Err(e) => {
            eprintln!("✗ Failed to list sessions: {}", e);
            std::process::exit(1);
        }
    };

    if sessions.is_empty() {
        println!("No stored sessions.");
        return;
    }

    println!(
        "{:<38} {:<21} {:<10} {:>6}  SEED",
        "SESSION", "STARTED (UTC)", "STATUS", "PAGES"
    );
    for (id, seed, start_time, status, node_count) in sessions {
        let started = DateTime::from_timestamp(start_time, 0)
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| start_time.to_string());

        // Pad before coloring so ANSI escapes don't break the columns
        let padded = format!("{:<10}", status);
        let status_str = match status.as_str() {
            "completed" => padded.green().to_string(),
            "cancelled" => padded.yellow().to_string(),
            _ => padded,
        };

        println!(
            "{:<38} {:<21} {} {:>6}  {}",
            id, started, status_str, node_count, seed
        );
    }
}
