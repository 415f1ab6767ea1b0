//
// dependency/operations.rs
//
// Host-facing dependency operations
//
// Every operation reads the whole buffer and computes the new block before
// touching it. Failures leave the buffer as it was. Writes go names first,
// then paths, so the earlier offsets stay valid.
//

use std::path::{Path, PathBuf};

use indexmap::IndexSet;

use super::block::{DependencyBlock, DependencyEntry};
use super::error::{DependencyError, Result};
use super::file_index::ProjectFileIndex;
use super::host::{Chooser, ProjectLister, TextBuffer};
use super::manifest::{manifest_module_names, matching_modules};
use super::merge::{merge, MergeMode};
use super::path_resolve::PathResolver;
use super::sort::sort_by_path;
use super::symbol::{body_identifiers, find_identifier, symbol_at, SymbolAtPoint};
use crate::config::AmdConfig;

/// Everything an operation needs from its host.
pub struct OperationContext<'a> {
    pub config: &'a AmdConfig,
    pub buffer: &'a mut dyn TextBuffer,
    pub project: &'a dyn ProjectLister,
    pub chooser: &'a mut dyn Chooser,
    /// Location of the file being edited
    pub file_path: PathBuf,
}

impl OperationContext<'_> {
    fn current_directory(&self) -> &Path {
        self.file_path.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// The operations a host can run. Point operations carry the byte offset of
/// the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    InjectSymbolAtPoint { offset: usize },
    RequireNodeModuleAtPoint { offset: usize },
    RequireRelativeModuleAtPoint { offset: usize },
    SortDependencies,
    UpdateAllDependenciesFromBody,
    ReindentBlock,
}

/// LSP command identifiers, in the order they are advertised.
pub const COMMAND_NAMES: &[&str] = &[
    "amdinject.injectSymbolAtPoint",
    "amdinject.requireNodeModuleAtPoint",
    "amdinject.requireRelativeModuleAtPoint",
    "amdinject.sortDependencies",
    "amdinject.updateAllDependenciesFromBody",
    "amdinject.reindentBlock",
];

impl Command {
    /// Look up a command by its LSP identifier.
    pub fn from_name(name: &str, offset: usize) -> Option<Self> {
        let command = match name {
            "amdinject.injectSymbolAtPoint" => Command::InjectSymbolAtPoint { offset },
            "amdinject.requireNodeModuleAtPoint" => Command::RequireNodeModuleAtPoint { offset },
            "amdinject.requireRelativeModuleAtPoint" => {
                Command::RequireRelativeModuleAtPoint { offset }
            }
            "amdinject.sortDependencies" => Command::SortDependencies,
            "amdinject.updateAllDependenciesFromBody" => Command::UpdateAllDependenciesFromBody,
            "amdinject.reindentBlock" => Command::ReindentBlock,
            _ => return None,
        };
        Some(command)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::InjectSymbolAtPoint { .. } => COMMAND_NAMES[0],
            Command::RequireNodeModuleAtPoint { .. } => COMMAND_NAMES[1],
            Command::RequireRelativeModuleAtPoint { .. } => COMMAND_NAMES[2],
            Command::SortDependencies => COMMAND_NAMES[3],
            Command::UpdateAllDependenciesFromBody => COMMAND_NAMES[4],
            Command::ReindentBlock => COMMAND_NAMES[5],
        }
    }

    /// Whether the command acts on the symbol under the cursor.
    pub fn needs_offset(&self) -> bool {
        matches!(
            self,
            Command::InjectSymbolAtPoint { .. }
                | Command::RequireNodeModuleAtPoint { .. }
                | Command::RequireRelativeModuleAtPoint { .. }
        )
    }
}

/// What a host shows after running a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationReport {
    pub message: String,
    /// The buffer text differs from before the command
    pub changed: bool,
    pub succeeded: bool,
}

/// Run `command` and turn any failure into a message.
pub fn execute(command: Command, ctx: &mut OperationContext<'_>) -> OperationReport {
    let before = ctx.buffer.text();
    match run(command, ctx) {
        Ok(message) => {
            let changed = ctx.buffer.text() != before;
            log::info!("{}: {}", command.name(), message);
            OperationReport {
                message,
                changed,
                succeeded: true,
            }
        }
        Err(err) => {
            if err.is_cancellation() {
                log::info!("{}: cancelled", command.name());
            } else {
                log::warn!("{} failed: {}", command.name(), err);
            }
            OperationReport {
                message: err.to_string(),
                changed: false,
                succeeded: false,
            }
        }
    }
}

/// Run `command`, propagating failures.
pub fn run(command: Command, ctx: &mut OperationContext<'_>) -> Result<String> {
    match command {
        Command::InjectSymbolAtPoint { offset } => inject_symbol_at_point(ctx, offset),
        Command::RequireNodeModuleAtPoint { offset } => require_node_module_at_point(ctx, offset),
        Command::RequireRelativeModuleAtPoint { offset } => {
            require_relative_module_at_point(ctx, offset)
        }
        Command::SortDependencies => sort_dependencies(ctx),
        Command::UpdateAllDependenciesFromBody => update_all_dependencies_from_body(ctx),
        Command::ReindentBlock => reindent_block(ctx),
    }
}

/// Add the project module named after the symbol at `offset`.
pub fn inject_symbol_at_point(ctx: &mut OperationContext<'_>, offset: usize) -> Result<String> {
    let text = ctx.buffer.text();
    let block = editable_block(&text)?;
    let symbol = symbol_under(&text, offset)?;

    let index = project_index(ctx);
    let resolver = PathResolver::new(ctx.config);
    let candidates = module_references(&index, &resolver, ctx.config, &symbol.name);
    let path = resolver.resolve(&symbol.name, &candidates, ctx.chooser, symbol.start)?;

    add_entry(ctx, &text, &block, path, symbol.name)
}

/// Add the node module from `package.json` that matches the symbol at `offset`.
///
/// When no module name matches, the full module list is offered.
pub fn require_node_module_at_point(
    ctx: &mut OperationContext<'_>,
    offset: usize,
) -> Result<String> {
    let text = ctx.buffer.text();
    let block = editable_block(&text)?;
    let symbol = symbol_under(&text, offset)?;

    let modules = manifest_module_names(
        ctx.current_directory(),
        ctx.config.include_dev_dependencies,
    )?;
    let matching = matching_modules(&symbol.name, &modules);
    let resolver = PathResolver::new(ctx.config);
    let module = if matching.is_empty() {
        resolver.choose(&symbol.name, &modules, ctx.chooser, symbol.start)?
    } else {
        resolver.resolve(&symbol.name, &matching, ctx.chooser, symbol.start)?
    };

    add_entry(ctx, &text, &block, module, symbol.name)
}

/// Add a module named after the symbol at `offset`, referenced relative to
/// the current file.
pub fn require_relative_module_at_point(
    ctx: &mut OperationContext<'_>,
    offset: usize,
) -> Result<String> {
    let text = ctx.buffer.text();
    let block = editable_block(&text)?;
    let symbol = symbol_under(&text, offset)?;

    let files = ctx.project.list_project_files();
    let index = ProjectFileIndex::build_relative(&files, ctx.current_directory(), &ctx.config.extension);
    let candidates = index.lookup(&symbol.name);
    let resolver = PathResolver::new(ctx.config);
    let path = resolver.resolve(&symbol.name, &candidates, ctx.chooser, symbol.start)?;

    add_entry(ctx, &text, &block, path, symbol.name)
}

/// Reorder the block by require path. Paths without a parameter stay after
/// the sorted pairs.
pub fn sort_dependencies(ctx: &mut OperationContext<'_>) -> Result<String> {
    let text = ctx.buffer.text();
    let block = DependencyBlock::parse(&text)?;
    let sorted = sort_by_path(&block);
    write_block(ctx, &text, &block, &sorted);
    Ok(format!("Sorted {} dependencies", sorted.paths.len()))
}

/// Add every project module the body uses but the block does not bind yet.
///
/// Existing entries keep their order; new ones follow in first-use order.
/// Identifiers with no project candidate are left alone.
pub fn update_all_dependencies_from_body(ctx: &mut OperationContext<'_>) -> Result<String> {
    let text = ctx.buffer.text();
    let block = editable_block(&text)?;

    let index = project_index(ctx);
    let resolver = PathResolver::new(ctx.config);
    let mut entries = block.entries();
    let mut added = Vec::new();

    for identifier in body_identifiers(&text, &block) {
        if block.contains_name(&identifier) || !index.contains_symbol(&identifier) {
            continue;
        }
        let candidates = module_references(&index, &resolver, ctx.config, &identifier);
        if candidates.is_empty() {
            continue;
        }
        let hint = find_identifier(&text, &identifier, block.names_span.end)
            .unwrap_or(block.names_span.end);
        let path = resolver.resolve(&identifier, &candidates, ctx.chooser, hint)?;
        entries.push(DependencyEntry::new(path, identifier.clone()));
        added.push(identifier);
    }

    let unpaired = block.unpaired_names().to_vec();
    let mut updated = merge(&block, &entries, MergeMode::ReplaceAll);
    updated.names.extend(unpaired);
    write_block(ctx, &text, &block, &updated);

    if added.is_empty() {
        Ok("No new dependencies found".to_string())
    } else {
        Ok(format!("Added {}", added.join(", ")))
    }
}

/// Reindent the block's path array and parameter list without changing them.
pub fn reindent_block(ctx: &mut OperationContext<'_>) -> Result<String> {
    let text = ctx.buffer.text();
    let block = DependencyBlock::parse(&text)?;
    let start = region_start(&text, block.paths_span.start);
    ctx.buffer.reindent(start, block.names_span.end);
    Ok("Reindented dependency block".to_string())
}

/// Parse the block an operation is about to rewrite.
///
/// Paths without a parameter (side-effect imports) would be dropped or
/// rebound by a positional rewrite, so such blocks are refused up front.
fn editable_block(text: &str) -> Result<DependencyBlock> {
    let block = DependencyBlock::parse(text)?;
    if !block.is_valid() {
        return Err(DependencyError::MalformedBlock(format!(
            "{} paths but only {} parameters",
            block.paths.len(),
            block.names.len()
        )));
    }
    Ok(block)
}

fn symbol_under(text: &str, offset: usize) -> Result<SymbolAtPoint> {
    symbol_at(text, offset).ok_or_else(|| DependencyError::SymbolNotFound(String::new()))
}

fn project_index(ctx: &OperationContext<'_>) -> ProjectFileIndex {
    let files = ctx.project.list_project_files();
    ProjectFileIndex::build(&files, ctx.config.subtree_filter(), &ctx.config.extension)
}

/// Distinct module references for the files named after `symbol`.
fn module_references(
    index: &ProjectFileIndex,
    resolver: &PathResolver<'_>,
    config: &AmdConfig,
    symbol: &str,
) -> Vec<String> {
    let references: IndexSet<String> = index
        .candidates(&config.file_name_for(symbol))
        .unwrap_or_default()
        .iter()
        .map(|candidate| resolver.reference_for(Path::new(candidate)))
        .collect();
    references.into_iter().collect()
}

fn add_entry(
    ctx: &mut OperationContext<'_>,
    text: &str,
    block: &DependencyBlock,
    path: String,
    name: String,
) -> Result<String> {
    let message = format!("Added {} as {}", path, name);
    let merged = merge(block, &[DependencyEntry::new(path, name)], MergeMode::Incremental);
    write_block(ctx, text, block, &merged);
    Ok(message)
}

/// Write `updated` over the regions `original` was parsed from, then
/// reindent from the first path line to the end of the parameter list.
fn write_block(
    ctx: &mut OperationContext<'_>,
    text: &str,
    original: &DependencyBlock,
    updated: &DependencyBlock,
) {
    let column = names_column(text, original, !updated.paths.is_empty());
    let names = updated.render_names(ctx.config.wrap_width.saturating_sub(column).max(1));
    ctx.buffer
        .replace_region(original.names_span.start, original.names_span.end, &names);

    // Paths always start on their own line below the `[`
    let mut paths = updated.render_paths();
    let on_opener_line = !text[original.array_open + 1..original.paths_span.start].contains('\n');
    let paths_start = if on_opener_line && !paths.is_empty() {
        paths.insert(0, '\n');
        original.array_open + 1
    } else {
        original.paths_span.start
    };
    ctx.buffer
        .replace_region(paths_start, original.paths_span.end, &paths);

    let names_end =
        paths_start + paths.len() + (original.names_span.start - original.paths_span.end) + names.len();
    let new_text = ctx.buffer.text();
    let start = region_start(&new_text, paths_start);
    ctx.buffer.reindent(start, names_end);

    log::trace!(
        "Wrote {} paths and {} names, reindented {}..{}",
        updated.paths.len(),
        updated.names.len(),
        start,
        names_end
    );
}

/// Column the parameter list will start at once the block is rewritten.
///
/// A non-empty path list ends with a newline, so the `]` starts a line
/// indented like the line holding the `[`.
fn names_column(text: &str, block: &DependencyBlock, paths_written: bool) -> usize {
    let names_start = block.names_span.start;
    let line_start = text[..names_start].rfind('\n').map(|i| i + 1).unwrap_or(0);
    if !paths_written || line_start > block.paths_span.end {
        return text[line_start..names_start].chars().count();
    }
    let opener_line = text[..block.array_open].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let indent = text[opener_line..]
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .count();
    indent + text[block.paths_span.end..names_start].chars().count()
}

/// `offset`, moved back to the start of its line when only whitespace precedes it.
fn region_start(text: &str, offset: usize) -> usize {
    let offset = offset.min(text.len());
    let line_start = text[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
    if text[line_start..offset].trim().is_empty() {
        line_start
    } else {
        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency::host::{FirstChoice, PresetChoice, ProjectFile, StringBuffer};
    use crate::indentation::IndentationConfig;

    fn project(paths: &[&str]) -> Vec<ProjectFile> {
        paths
            .iter()
            .filter_map(|p| ProjectFile::from_path(*p))
            .collect()
    }

    fn config() -> AmdConfig {
        AmdConfig {
            project_root: Some(PathBuf::from("/project")),
            indentation: IndentationConfig {
                tab_size: 2,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn buffer(text: &str, config: &AmdConfig) -> StringBuffer {
        StringBuffer::new(text).with_indentation(config.indentation.clone())
    }

    fn run_with(
        command: Command,
        text: &str,
        files: &[&str],
        chooser: &mut dyn Chooser,
    ) -> (Result<String>, String) {
        let config = config();
        let mut buf = buffer(text, &config);
        let listing = project(files);
        let mut ctx = OperationContext {
            config: &config,
            buffer: &mut buf,
            project: &listing,
            chooser,
            file_path: PathBuf::from("/project/public/script/app/main.js"),
        };
        let result = run(command, &mut ctx);
        (result, buf.contents)
    }

    const BLOCK: &str = "require([\n  \"app/Alpha\"\n], function (Alpha) {\n  return new Widget();\n});";

    #[test]
    fn test_inject_symbol_at_point() {
        let offset = BLOCK.find("Widget").unwrap();
        let (result, text) = run_with(
            Command::InjectSymbolAtPoint { offset },
            BLOCK,
            &["/project/public/script/ui/Widget.js", "/project/test/Widget.js"],
            &mut FirstChoice,
        );
        assert_eq!(result.unwrap(), "Added ui/Widget as Widget");
        assert_eq!(
            text,
            "require([\n  \"app/Alpha\",\n  \"ui/Widget\"\n], function (Alpha, Widget) {\n  return new Widget();\n});"
        );
    }

    #[test]
    fn test_inject_existing_name_overwrites_path() {
        let text = "require([\n  \"old/Widget\"\n], function (Widget) {\n  new Widget();\n});";
        let offset = text.rfind("Widget").unwrap();
        let (result, text) = run_with(
            Command::InjectSymbolAtPoint { offset },
            text,
            &["/project/public/script/ui/Widget.js"],
            &mut FirstChoice,
        );
        assert!(result.is_ok());
        assert!(text.starts_with("require([\n  \"ui/Widget\"\n], function (Widget) {"));
    }

    #[test]
    fn test_inject_ambiguous_declined_leaves_buffer() {
        let offset = BLOCK.find("Widget").unwrap();
        let mut chooser = PresetChoice::none();
        let (result, text) = run_with(
            Command::InjectSymbolAtPoint { offset },
            BLOCK,
            &[
                "/project/public/script/ui/Widget.js",
                "/project/public/script/legacy/Widget.js",
            ],
            &mut chooser,
        );
        assert!(matches!(result, Err(DependencyError::NoChoiceMade)));
        assert_eq!(text, BLOCK);
        assert_eq!(chooser.offered, vec!["ui/Widget", "legacy/Widget"]);
        assert_eq!(chooser.hint, Some(offset));
    }

    #[test]
    fn test_inject_unknown_symbol() {
        let offset = BLOCK.find("Widget").unwrap();
        let (result, text) = run_with(
            Command::InjectSymbolAtPoint { offset },
            BLOCK,
            &["/project/public/script/ui/Other.js"],
            &mut FirstChoice,
        );
        assert!(matches!(result, Err(DependencyError::SymbolNotFound(s)) if s == "Widget"));
        assert_eq!(text, BLOCK);
    }

    #[test]
    fn test_inject_without_block() {
        let (result, _) = run_with(
            Command::InjectSymbolAtPoint { offset: 0 },
            "var x = Widget;",
            &[],
            &mut FirstChoice,
        );
        assert!(matches!(result, Err(DependencyError::NoDependencyBlock)));
    }

    #[test]
    fn test_inject_into_single_line_block() {
        let text = "define([], function () {\n  Widget.make();\n});";
        let offset = text.find("Widget").unwrap();
        let (result, text) = run_with(
            Command::InjectSymbolAtPoint { offset },
            text,
            &["/project/public/script/ui/Widget.js"],
            &mut FirstChoice,
        );
        assert!(result.is_ok());
        assert_eq!(
            text,
            "define([\n  \"ui/Widget\"\n], function (Widget) {\n  Widget.make();\n});"
        );
    }

    #[test]
    fn test_require_relative_module() {
        let offset = BLOCK.find("Widget").unwrap();
        let (result, text) = run_with(
            Command::RequireRelativeModuleAtPoint { offset },
            BLOCK,
            &["/project/public/script/app/views/Widget.js"],
            &mut FirstChoice,
        );
        assert_eq!(result.unwrap(), "Added ./views/Widget as Widget");
        assert!(text.contains("\"./views/Widget\"\n], function (Alpha, Widget)"));
    }

    #[test]
    fn test_sort_dependencies() {
        let text = "require([\n  \"./z\",\n  \"./a\"\n], function (Z, A) {\n});";
        let (result, text) = run_with(Command::SortDependencies, text, &[], &mut FirstChoice);
        assert_eq!(result.unwrap(), "Sorted 2 dependencies");
        assert_eq!(text, "require([\n  \"./a\",\n  \"./z\"\n], function (A, Z) {\n});");
    }

    #[test]
    fn test_sort_already_sorted_is_byte_identical() {
        let text = "require([\n  \"./a\",\n  \"./b\"\n], function (A, B) {\n});";
        let (_, after) = run_with(Command::SortDependencies, text, &[], &mut FirstChoice);
        assert_eq!(after, text);
    }

    const SIDE_EFFECT_BLOCK: &str =
        "require([\n  \"jquery\",\n  \"bootstrap\"\n], function ($) {\n  new Widget();\n});";

    #[test]
    fn test_sort_keeps_path_without_parameter() {
        let text = "require([\n  \"underscore\",\n  \"jquery\",\n  \"bootstrap\"\n], function (_, $) {\n});";
        let (result, text) = run_with(Command::SortDependencies, text, &[], &mut FirstChoice);
        assert_eq!(result.unwrap(), "Sorted 3 dependencies");
        assert_eq!(
            text,
            "require([\n  \"jquery\",\n  \"underscore\",\n  \"bootstrap\"\n], function ($, _) {\n});"
        );
    }

    #[test]
    fn test_update_all_refuses_path_without_parameter() {
        let (result, text) = run_with(
            Command::UpdateAllDependenciesFromBody,
            SIDE_EFFECT_BLOCK,
            &["/project/public/script/ui/Widget.js"],
            &mut FirstChoice,
        );
        assert!(matches!(result, Err(DependencyError::MalformedBlock(_))));
        assert_eq!(text, SIDE_EFFECT_BLOCK);
    }

    #[test]
    fn test_inject_refuses_path_without_parameter() {
        let offset = SIDE_EFFECT_BLOCK.find("Widget").unwrap();
        let (result, text) = run_with(
            Command::InjectSymbolAtPoint { offset },
            SIDE_EFFECT_BLOCK,
            &["/project/public/script/ui/Widget.js"],
            &mut FirstChoice,
        );
        assert!(matches!(result, Err(DependencyError::MalformedBlock(_))));
        assert_eq!(text, SIDE_EFFECT_BLOCK);
    }

    #[test]
    fn test_reindent_accepts_path_without_parameter() {
        let text = "require([\n\"jquery\",\n      \"bootstrap\"\n], function ($) {\n});";
        let (result, text) = run_with(Command::ReindentBlock, text, &[], &mut FirstChoice);
        assert!(result.is_ok());
        assert_eq!(
            text,
            "require([\n  \"jquery\",\n  \"bootstrap\"\n], function ($) {\n});"
        );
    }

    #[test]
    fn test_update_all_from_body() {
        let text = "require([\n  \"app/Alpha\"\n], function (Alpha) {\n  var b = new Beta(Alpha);\n  return Gamma.of(b, Missing);\n});";
        let (result, text) = run_with(
            Command::UpdateAllDependenciesFromBody,
            text,
            &[
                "/project/public/script/app/Beta.js",
                "/project/public/script/lib/Gamma.js",
            ],
            &mut FirstChoice,
        );
        assert_eq!(result.unwrap(), "Added Beta, Gamma");
        assert!(text.starts_with(
            "require([\n  \"app/Alpha\",\n  \"app/Beta\",\n  \"lib/Gamma\"\n], function (Alpha, Beta, Gamma) {"
        ));
    }

    #[test]
    fn test_update_all_nothing_new() {
        let (result, text) = run_with(
            Command::UpdateAllDependenciesFromBody,
            BLOCK,
            &[],
            &mut FirstChoice,
        );
        assert_eq!(result.unwrap(), "No new dependencies found");
        assert_eq!(text, BLOCK);
    }

    #[test]
    fn test_reindent_block() {
        let text = "require([\n\"./a\",\n      \"./b\"\n    ], function (A, B) {\n});";
        let (result, text) = run_with(Command::ReindentBlock, text, &[], &mut FirstChoice);
        assert!(result.is_ok());
        assert_eq!(text, "require([\n  \"./a\",\n  \"./b\"\n], function (A, B) {\n});");
    }

    #[test]
    fn test_execute_reports_errors_as_messages() {
        let config = config();
        let mut buf = buffer("var x;", &config);
        let listing: Vec<ProjectFile> = Vec::new();
        let mut chooser = FirstChoice;
        let mut ctx = OperationContext {
            config: &config,
            buffer: &mut buf,
            project: &listing,
            chooser: &mut chooser,
            file_path: PathBuf::from("/project/main.js"),
        };
        let report = execute(Command::SortDependencies, &mut ctx);
        assert!(!report.succeeded);
        assert!(!report.changed);
        assert_eq!(report.message, "No require or define block found");
    }

    #[test]
    fn test_execute_reports_change() {
        let config = config();
        let mut buf = buffer("require([\n  \"./b\",\n  \"./a\"\n], function (B, A) {\n});", &config);
        let listing: Vec<ProjectFile> = Vec::new();
        let mut chooser = FirstChoice;
        let mut ctx = OperationContext {
            config: &config,
            buffer: &mut buf,
            project: &listing,
            chooser: &mut chooser,
            file_path: PathBuf::from("/project/main.js"),
        };
        let report = execute(Command::SortDependencies, &mut ctx);
        assert!(report.succeeded);
        assert!(report.changed);
    }

    #[test]
    fn test_command_names_round_trip() {
        for name in COMMAND_NAMES {
            let command = Command::from_name(name, 3).unwrap();
            assert_eq!(command.name(), *name);
        }
        assert!(Command::from_name("amdinject.unknown", 0).is_none());
        assert!(Command::InjectSymbolAtPoint { offset: 0 }.needs_offset());
        assert!(!Command::SortDependencies.needs_offset());
    }

    #[test]
    fn test_names_column() {
        let text = "  require([\n    \"./a\"\n  ], function (A) {\n  });";
        let block = DependencyBlock::parse(text).unwrap();
        assert_eq!(names_column(text, &block, true), 15);

        let single = "require([\"./a\"], function (A) {});";
        let block = DependencyBlock::parse(single).unwrap();
        assert_eq!(names_column(single, &block, true), 13);
        assert_eq!(names_column(single, &block, false), single.find('A').unwrap());
    }

    #[test]
    fn test_wrap_counts_from_parameter_column() {
        let config = AmdConfig {
            wrap_width: 30,
            ..config()
        };
        let text = "require([\n  \"./c\",\n  \"./a\",\n  \"./b\"\n], function (Charlie, Alpha, Bravo) {\n});";
        let mut buf = buffer(text, &config);
        let listing: Vec<ProjectFile> = Vec::new();
        let mut chooser = FirstChoice;
        let mut ctx = OperationContext {
            config: &config,
            buffer: &mut buf,
            project: &listing,
            chooser: &mut chooser,
            file_path: PathBuf::from("/project/main.js"),
        };
        run(Command::SortDependencies, &mut ctx).unwrap();
        assert_eq!(
            buf.contents,
            "require([\n  \"./a\",\n  \"./b\",\n  \"./c\"\n], function (Alpha, Bravo,\n             Charlie) {\n});"
        );
        assert!(buf.contents.lines().all(|line| line.chars().count() <= 30));
    }

    #[test]
    fn test_region_start() {
        let text = "a\n   b";
        assert_eq!(region_start(text, 5), 2);
        assert_eq!(region_start("ab[c", 3), 3);
    }
}
