//
// main.rs
//
// Entry point for the amdinject command line and language server
//

use std::env;

use amdinject::{backend, cli};

fn print_usage() {
    println!(
        "amdinject {}, an AMD require/define dependency injector.",
        env!("CARGO_PKG_VERSION")
    );
    print!(
        r#"
Usage: amdinject [OPTIONS]
       amdinject <COMMAND> <FILE> [COMMAND OPTIONS]

Available options:

--stdio                      Start the LSP server using stdio transport
--version                    Print the version
--help                       Print this help message

Commands:

inject                       Require the project module named after a symbol
require-node                 Require the package.json module matching a symbol
require-relative             Require a module by path relative to FILE
sort                         Sort the dependency block by path
update                       Require every project module the body uses
reindent                     Reindent the dependency block

Command options:

--offset <N>                 Byte offset of the symbol
--symbol <NAME>              Name of the symbol (first use in the body)
--root <DIR>                 Project root to search for modules
--config <FILE>              JSON config file (default: <root>/.amdinject.json)
--dry-run                    Print the result instead of writing FILE

"#
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut argv = env::args();
    argv.next(); // skip executable name

    let Some(first) = argv.next() else {
        print_usage();
        return Ok(());
    };

    match first.as_str() {
        "--stdio" => {
            if let Some(other) = argv.next() {
                return Err(anyhow::anyhow!("Unknown argument: '{other}'"));
            }
            env_logger::init();
            backend::start_lsp().await
        }
        "--version" => {
            println!("amdinject {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "--help" => {
            print_usage();
            Ok(())
        }
        other if other.starts_with('-') => Err(anyhow::anyhow!("Unknown argument: '{other}'")),
        command => {
            env_logger::init();
            let args = cli::commands::parse_args(command, &mut argv).map_err(anyhow::Error::msg)?;
            cli::commands::run(&args)
        }
    }
}
