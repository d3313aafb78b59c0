use std::sync::Arc;

use anyhow::Context;
use args::{Args, Command, ServeArgs};
use clap::Parser;
use log::{error, info};
use workbench::server::{Server, ServerConfig};
use workbench::workspace::diff::{added_decorations, diff_lines};
use workbench::workspace::fs_handle::FsPicker;
use workbench::workspace::notifier::LogNotifier;
use workbench::workspace::remote::{RemoteClient, RemoteTransport};
use workbench::workspace::{FileNode, SessionManager};

mod args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    env_logger::builder().filter_level(args.log_level).init();

    match args.command {
        Command::Serve(serve) => run_server(serve).await,
        Command::Fetch { filename, server } => {
            let body = RemoteClient::new(server).fetch(&filename).await?;
            println!("{body}");
            Ok(())
        }
        Command::Push {
            filename,
            source,
            server,
        } => {
            let content = tokio::fs::read_to_string(&source)
                .await
                .with_context(|| format!("reading {}", source.display()))?;
            RemoteClient::new(server).push(&filename, &content).await?;
            info!("Uploaded {} as {}", source.display(), filename);
            Ok(())
        }
        Command::Generate { server } => {
            let report = RemoteClient::new(server).generate_fixture().await?;
            println!("{} ({})", report.message, report.path);
            Ok(())
        }
        Command::Diff { original, current } => {
            let original = tokio::fs::read_to_string(&original)
                .await
                .with_context(|| format!("reading {}", original.display()))?;
            let current_text = tokio::fs::read_to_string(&current)
                .await
                .with_context(|| format!("reading {}", current.display()))?;

            let ranges = diff_lines(&original, &current_text);
            for decoration in added_decorations(&ranges) {
                println!("+ {}-{}", decoration.start_line, decoration.end_line);
            }
            Ok(())
        }
        Command::Tree { dir } => {
            let mut session = SessionManager::new(
                Box::new(FsPicker::new(Some(dir))),
                Arc::new(RemoteClient::default()),
                Arc::new(LogNotifier),
            );
            session.open_folder().await;
            for root in session.file_tree() {
                print_tree(root, 0);
            }
            Ok(())
        }
    }
}

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    if args.files_dir.exists() && !args.files_dir.is_dir() {
        error!("Files directory {:?} is not a directory", args.files_dir);
        std::process::exit(1);
    }

    let config = ServerConfig::new(&args.files_dir, args.fixture_items)
        .with_context(|| format!("preparing files directory {:?}", args.files_dir))?;

    info!("Files directory: {:?}", config.files_dir);
    info!("Fixture size: {} items", config.fixture_items);

    Server::new(config).run(&args.host, args.port).await?;
    Ok(())
}

fn print_tree(node: &FileNode, depth: usize) {
    let indent = "  ".repeat(depth);
    match node.language {
        Some(language) if node.is_file() => {
            println!("{}{} ({})", indent, node.name, language.as_str())
        }
        _ => println!("{}{}/", indent, node.name),
    }
    for child in node.children.iter().flatten() {
        print_tree(child, depth + 1);
    }
}
