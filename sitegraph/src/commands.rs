use crate::CLAP_STYLING;
use clap::{arg, command};

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("sitegraph")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("sitegraph")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("crawl")
                .about(
                    "Crawl a website breadth-first from a seed URL and record its page graph, \
                including any broken links and the paths that reach them.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The seed URL to crawl from (scheme optional, https assumed)"),
                )
                .arg(
                    arg!(-t --"threads" <NUM_WORKERS>)
                        .required(false)
                        .help("The number of async worker 'threads' in the worker pool.")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("10"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("10"),
                )
                .arg(
                    arg!(--"max-depth" <DEPTH>)
                        .required(false)
                        .help("Do not enqueue pages beyond this hop distance from the seed")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--"max-pages" <COUNT>)
                        .required(false)
                        .help("Stop admitting new pages once this many have been discovered")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--"exclude-ext" <EXT>)
                        .required(false)
                        .help("File extension to skip, repeatable; replaces the built-in list")
                        .action(clap::ArgAction::Append),
                )
                .arg(
                    arg!(--"leaf-segment" <PATH>)
                        .required(false)
                        .help(
                            "Path segment whose leaf pages should not be entered from \
                        each other's lateral links",
                        )
                        .default_value("/blog/"),
                )
                .arg(
                    arg!(--"no-leaf-filter")
                        .required(false)
                        .help("Disable the lateral leaf-link filter entirely")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(-d --"database" <PATH>)
                        .required(false)
                        .help("SQLite database in which to store the crawl session")
                        .default_value("sitegraph.db"),
                )
                .arg(
                    arg!(--"no-save")
                        .required(false)
                        .help("Do not store the crawl session in the database")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json, csv, dot")
                        .value_parser(["text", "json", "csv", "dot"])
                        .default_value("text"),
                ),
        )
        .subcommand(
            command!("export")
                .about("Re-render a stored crawl session without re-crawling the site")
                .arg(
                    arg!(-d --"database" <PATH>)
                        .required(false)
                        .help("SQLite database holding crawl sessions")
                        .default_value("sitegraph.db"),
                )
                .arg(
                    arg!(-s --"session" <ID>)
                        .required(false)
                        .help("Session id to export (default: the most recent session)"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save output to file (default: display to screen)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Output format: text, json, csv, dot")
                        .value_parser(["text", "json", "csv", "dot"])
                        .default_value("text"),
                ),
        )
        .subcommand(
            command!("sessions")
                .about("List stored crawl sessions, newest first")
                .arg(
                    arg!(-d --"database" <PATH>)
                        .required(false)
                        .help("SQLite database holding crawl sessions")
                        .default_value("sitegraph.db"),
                ),
        )
}
