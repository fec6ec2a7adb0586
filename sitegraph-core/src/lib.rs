pub mod crawl;
pub mod data;
pub mod graph;
pub mod report;

pub use data::Database;
pub use graph::SiteGraph;

use colored::Colorize;

pub fn print_banner() {
    let banner = r#"
        _ __                             __
   ___ (_) /____ ___ ________ ____  ___ / /
  (_-</ / __/ -_) _ `/ __/ _ `/ _ \/ _ \ _ \
 /___/_/\__/\__/\_, /_/  \_,_/ .__/_//_/_//_/
               /___/        /_/
"#;
    println!("{}", banner.bright_cyan());
    println!(
        "  {} {}",
        "sitegraph".bright_white().bold(),
        env!("CARGO_PKG_VERSION").bright_white()
    );
    println!("  {}\n", "maps the reachable page graph of a website".dimmed());
}
