// cli/commands.rs — `amdinject <command> <file>` subcommands
//
// Runs one dependency operation against a file on disk. Ambiguous
// candidates are offered on stderr and answered on stdin.

use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};

use crate::config::{anchor_config, parse_config, AmdConfig};
use crate::dependency::{
    execute, find_identifier, Chooser, Command, DependencyBlock, OperationContext,
    OperationReport, StringBuffer, TextBuffer,
};
use crate::project::{find_project_root, FsProject};

/// Config file looked up at the project root when `--config` is not given
pub const CONFIG_FILE_NAME: &str = ".amdinject.json";

/// All valid subcommand names.
pub const SUBCOMMANDS: &[&str] = &[
    "inject",
    "require-node",
    "require-relative",
    "sort",
    "update",
    "reindent",
];

/// Where the symbol for a point command comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Offset(usize),
    Symbol(String),
}

/// Parsed arguments for a dependency subcommand.
#[derive(Debug)]
pub struct CommandArgs {
    pub command: String,
    pub file: PathBuf,
    pub target: Option<Target>,
    pub root: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub dry_run: bool,
}

impl CommandArgs {
    fn is_point_command(&self) -> bool {
        matches!(
            self.command.as_str(),
            "inject" | "require-node" | "require-relative"
        )
    }
}

/// Parse subcommand arguments from the remaining CLI args.
///
/// Expected usage: `amdinject <command> <file> [--offset N | --symbol NAME]
/// [--root DIR] [--config FILE] [--dry-run]`
pub fn parse_args(
    command: &str,
    args: &mut impl Iterator<Item = String>,
) -> Result<CommandArgs, String> {
    if !SUBCOMMANDS.contains(&command) {
        return Err(format!(
            "Unknown command '{}'. Valid commands: {}",
            command,
            SUBCOMMANDS.join(", ")
        ));
    }

    let mut file: Option<PathBuf> = None;
    let mut target: Option<Target> = None;
    let mut root: Option<PathBuf> = None;
    let mut config: Option<PathBuf> = None;
    let mut dry_run = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--dry-run" => dry_run = true,
            "--offset" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--offset requires a byte offset".to_string())?;
                let offset = value
                    .parse::<usize>()
                    .map_err(|_| format!("Invalid offset '{}'", value))?;
                if target.is_some() {
                    return Err("Use only one of --offset and --symbol".to_string());
                }
                target = Some(Target::Offset(offset));
            }
            "--symbol" => {
                let name = args
                    .next()
                    .ok_or_else(|| "--symbol requires a name".to_string())?;
                if target.is_some() {
                    return Err("Use only one of --offset and --symbol".to_string());
                }
                target = Some(Target::Symbol(name));
            }
            "--root" => {
                let dir = args
                    .next()
                    .ok_or_else(|| "--root requires a directory".to_string())?;
                root = Some(PathBuf::from(dir));
            }
            "--config" => {
                let path = args
                    .next()
                    .ok_or_else(|| "--config requires a file".to_string())?;
                config = Some(PathBuf::from(path));
            }
            other if other.starts_with('-') => {
                return Err(format!("Unknown flag: '{}'", other));
            }
            _ => {
                if file.is_some() {
                    return Err("Multiple files provided; expected exactly one".to_string());
                }
                file = Some(PathBuf::from(arg));
            }
        }
    }

    let file = file.ok_or_else(|| "Missing required <file> argument".to_string())?;
    if !file.is_file() {
        return Err(format!("File does not exist: {}", file.display()));
    }

    let args = CommandArgs {
        command: command.to_string(),
        file,
        target,
        root,
        config,
        dry_run,
    };
    if args.is_point_command() && args.target.is_none() {
        return Err(format!("'{}' needs --offset or --symbol", command));
    }
    Ok(args)
}

/// Load configuration for `root`: an explicit `--config` file, else
/// `.amdinject.json` in the root, else defaults. Relative paths in the file
/// are resolved against the file's directory.
pub fn load_config(explicit: Option<&Path>, root: &Path) -> anyhow::Result<AmdConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => Some(root.join(CONFIG_FILE_NAME)).filter(|p| p.is_file()),
    };
    let Some(path) = path else {
        return Ok(anchor_config(AmdConfig::default(), root));
    };

    let text = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("Invalid JSON in config {}", path.display()))?;
    let Some(config) = parse_config(&value) else {
        bail!("Config {} must contain a JSON object", path.display());
    };
    log::trace!("Loaded config from {}", path.display());

    let base = path.parent().unwrap_or(root);
    Ok(anchor_config(config, base))
}

/// Asks on a writer and reads the answer from a reader: a 1-based number
/// picks that option, anything else declines.
pub struct PromptChooser<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptChooser<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Chooser for PromptChooser<R, W> {
    fn choose_one(&mut self, options: &[String], hint: usize) -> Option<String> {
        let mut prompt = format!("Choose a module (symbol at offset {}):\n", hint);
        for (i, option) in options.iter().enumerate() {
            prompt.push_str(&format!("  {}) {}\n", i + 1, option));
        }
        prompt.push_str("> ");
        if let Err(e) = self.output.write_all(prompt.as_bytes()).and_then(|_| self.output.flush()) {
            log::warn!("Failed to write prompt: {}", e);
            return None;
        }

        let mut line = String::new();
        self.input.read_line(&mut line).ok()?;
        let choice = line.trim().parse::<usize>().ok()?;
        options.get(choice.checked_sub(1)?).cloned()
    }
}

/// Byte offset the command acts on.
fn resolve_offset(text: &str, target: Option<&Target>) -> anyhow::Result<usize> {
    match target {
        None => Ok(0),
        Some(Target::Offset(offset)) => Ok(*offset),
        Some(Target::Symbol(name)) => {
            // prefer a use in the body over a mention in the require paths
            let body_start = DependencyBlock::parse(text)
                .map(|block| block.names_span.end)
                .unwrap_or(0);
            find_identifier(text, name, body_start)
                .or_else(|| find_identifier(text, name, 0))
                .with_context(|| format!("Symbol '{}' does not occur in the file", name))
        }
    }
}

fn to_command(name: &str, offset: usize) -> Option<Command> {
    let command = match name {
        "inject" => Command::InjectSymbolAtPoint { offset },
        "require-node" => Command::RequireNodeModuleAtPoint { offset },
        "require-relative" => Command::RequireRelativeModuleAtPoint { offset },
        "sort" => Command::SortDependencies,
        "update" => Command::UpdateAllDependenciesFromBody,
        "reindent" => Command::ReindentBlock,
        _ => return None,
    };
    Some(command)
}

/// Run the subcommand with `chooser`, writing the file unless `dry_run`.
///
/// Returns the report and the resulting text.
pub fn run_with_chooser(
    args: &CommandArgs,
    chooser: &mut dyn Chooser,
) -> anyhow::Result<(OperationReport, String)> {
    let file = args
        .file
        .canonicalize()
        .with_context(|| format!("Cannot resolve {}", args.file.display()))?;
    let root = match &args.root {
        Some(root) => root
            .canonicalize()
            .with_context(|| format!("Cannot resolve root {}", root.display()))?,
        None => find_project_root(&file, &AmdConfig::default()),
    };
    let mut config = load_config(args.config.as_deref(), &root)?;
    if args.root.is_some() {
        config.project_root = Some(root.clone());
    }
    let project_root = config.project_root.clone().unwrap_or(root);

    let text = fs::read_to_string(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let offset = resolve_offset(&text, args.target.as_ref())?;
    let command = to_command(&args.command, offset)
        .with_context(|| format!("Unknown command '{}'", args.command))?;

    let project = FsProject::new(project_root, &config);
    let mut buffer = StringBuffer::new(text).with_indentation(config.indentation.clone());
    let report = {
        let mut ctx = OperationContext {
            config: &config,
            buffer: &mut buffer,
            project: &project,
            chooser,
            file_path: file.clone(),
        };
        execute(command, &mut ctx)
    };

    if report.changed && !args.dry_run {
        fs::write(&file, buffer.text())
            .with_context(|| format!("Failed to write {}", file.display()))?;
    }
    Ok((report, buffer.contents))
}

/// Run the subcommand, prompting on the terminal when a choice is needed.
pub fn run(args: &CommandArgs) -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let mut chooser = PromptChooser::new(stdin.lock(), std::io::stderr());
    let (report, text) = run_with_chooser(args, &mut chooser)?;

    if args.dry_run && report.succeeded {
        print!("{}", text);
    }
    if !report.succeeded {
        bail!("{}", report.message);
    }
    eprintln!("{}", report.message);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency::FirstChoice;
    use tempfile::TempDir;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    fn temp_file(dir: &TempDir, relative: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_parse_args() {
        let dir = TempDir::new().unwrap();
        let file = temp_file(&dir, "main.js", "");
        let file_arg = file.to_string_lossy().to_string();
        let parsed = parse_args(
            "inject",
            &mut args(&[&file_arg, "--symbol", "Widget", "--dry-run", "--root", "/p"]),
        )
        .unwrap();
        assert_eq!(parsed.file, file);
        assert_eq!(parsed.target, Some(Target::Symbol("Widget".to_string())));
        assert_eq!(parsed.root, Some(PathBuf::from("/p")));
        assert!(parsed.dry_run);
    }

    #[test]
    fn test_parse_args_errors() {
        let dir = TempDir::new().unwrap();
        let file = temp_file(&dir, "main.js", "");
        let file_arg = file.to_string_lossy().to_string();

        assert!(parse_args("bogus", &mut args(&[&file_arg])).is_err());
        assert!(parse_args("sort", &mut args(&[])).is_err());
        assert!(parse_args("sort", &mut args(&["/no/such/file.js"])).is_err());
        assert!(parse_args("inject", &mut args(&[&file_arg])).is_err());
        assert!(parse_args("inject", &mut args(&[&file_arg, "--offset", "x"])).is_err());
        assert!(parse_args(
            "inject",
            &mut args(&[&file_arg, "--offset", "1", "--symbol", "A"])
        )
        .is_err());
        assert!(parse_args("sort", &mut args(&[&file_arg, "--verbose"])).is_err());
        assert!(parse_args("sort", &mut args(&[&file_arg])).is_ok());
    }

    #[test]
    fn test_load_config_from_project_root() {
        let dir = TempDir::new().unwrap();
        temp_file(
            &dir,
            CONFIG_FILE_NAME,
            r#"{ "subtreeMarker": "/src/", "aliases": { "vendor": "lib/vendor" } }"#,
        );
        let config = load_config(None, dir.path()).unwrap();
        assert_eq!(config.subtree_marker, "/src/");
        assert_eq!(config.aliases[0].directory, dir.path().join("lib/vendor"));
        assert_eq!(config.project_root.as_deref(), Some(dir.path()));
    }

    #[test]
    fn test_load_config_defaults_and_errors() {
        let dir = TempDir::new().unwrap();
        let config = load_config(None, dir.path()).unwrap();
        assert_eq!(config.subtree_marker, "/script/");

        let bad = temp_file(&dir, "bad.json", "[1, 2]");
        assert!(load_config(Some(&bad), dir.path()).is_err());
        let broken = temp_file(&dir, "broken.json", "{");
        assert!(load_config(Some(&broken), dir.path()).is_err());
    }

    #[test]
    fn test_prompt_chooser() {
        let options = vec!["a/Foo".to_string(), "b/Foo".to_string()];
        let mut output = Vec::new();
        let mut chooser = PromptChooser::new("2\n".as_bytes(), &mut output);
        assert_eq!(chooser.choose_one(&options, 12), Some("b/Foo".to_string()));
        let shown = String::from_utf8(output).unwrap();
        assert!(shown.contains("1) a/Foo"));
        assert!(shown.contains("offset 12"));

        let mut chooser = PromptChooser::new("\n".as_bytes(), Vec::new());
        assert_eq!(chooser.choose_one(&options, 0), None);
        let mut chooser = PromptChooser::new("0\n".as_bytes(), Vec::new());
        assert_eq!(chooser.choose_one(&options, 0), None);
    }

    #[test]
    fn test_resolve_symbol_prefers_body() {
        let text = "require([\n  \"ui/Widget\"\n], function (Widget) {\n  new Widget();\n});";
        let offset = resolve_offset(text, Some(&Target::Symbol("Widget".to_string()))).unwrap();
        assert_eq!(offset, text.find("Widget(").unwrap());
        assert!(resolve_offset(text, Some(&Target::Symbol("Nope".to_string()))).is_err());
    }

    #[test]
    fn test_run_writes_file() {
        let dir = TempDir::new().unwrap();
        temp_file(&dir, "package.json", "{}");
        temp_file(&dir, "public/script/ui/Widget.js", "");
        let main = temp_file(
            &dir,
            "public/script/app/main.js",
            "require([\n    \"app/Alpha\"\n], function (Alpha) {\n    new Widget();\n});\n",
        );

        let parsed = CommandArgs {
            command: "inject".to_string(),
            file: main.clone(),
            target: Some(Target::Symbol("Widget".to_string())),
            root: None,
            config: None,
            dry_run: false,
        };
        let (report, _) = run_with_chooser(&parsed, &mut FirstChoice).unwrap();
        assert!(report.succeeded, "{}", report.message);
        assert!(report.changed);
        assert_eq!(
            fs::read_to_string(&main).unwrap(),
            "require([\n    \"app/Alpha\",\n    \"ui/Widget\"\n], function (Alpha, Widget) {\n    new Widget();\n});\n"
        );
    }

    #[test]
    fn test_dry_run_leaves_file() {
        let dir = TempDir::new().unwrap();
        let original = "require([\n    \"./b\",\n    \"./a\"\n], function (B, A) {\n});\n";
        let main = temp_file(&dir, "main.js", original);
        let parsed = CommandArgs {
            command: "sort".to_string(),
            file: main.clone(),
            target: None,
            root: Some(dir.path().to_path_buf()),
            config: None,
            dry_run: true,
        };
        let (report, text) = run_with_chooser(&parsed, &mut FirstChoice).unwrap();
        assert!(report.changed);
        assert!(text.contains("\"./a\",\n    \"./b\""));
        assert_eq!(fs::read_to_string(&main).unwrap(), original);
    }
}
