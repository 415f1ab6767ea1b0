//
// backend.rs
//
// Language server host for the dependency operations
//

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use dashmap::DashMap;
use ropey::Rope;
use serde_json::Value;
use tokio::sync::RwLock;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::Client;
use tower_lsp::LanguageServer;
use tower_lsp::LspService;
use tower_lsp::Server;

use crate::config::{anchor_config, parse_config, AmdConfig};
use crate::dependency::{run, Command, DependencyError, OperationContext, PresetChoice, COMMAND_NAMES};
use crate::document::{Document, RopeBuffer};
use crate::project::{find_project_root, FsProject};
use crate::utf16::position_to_byte_offset;

/// Upper bound on questions asked for one command
const MAX_CHOICES: usize = 32;

pub struct Backend {
    client: Client,
    documents: DashMap<Url, Document>,
    config: RwLock<AmdConfig>,
    workspace_folders: RwLock<Vec<PathBuf>>,
}

impl Backend {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            documents: DashMap::new(),
            config: RwLock::new(AmdConfig::default()),
            workspace_folders: RwLock::new(Vec::new()),
        }
    }

    /// Current contents of `uri`: the open document, or the file on disk.
    async fn document_rope(&self, uri: &Url) -> Option<Rope> {
        if let Some(doc) = self.documents.get(uri) {
            return Some(doc.contents.clone());
        }
        let path = uri.to_file_path().ok()?;
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Some(Rope::from_str(&text)),
            Err(e) => {
                log::warn!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Configuration with relative paths resolved for `file`.
    async fn config_for(&self, file: &Path) -> AmdConfig {
        let config = self.config.read().await.clone();
        let folders = self.workspace_folders.read().await;
        let base = folders
            .iter()
            .filter(|folder| file.starts_with(folder))
            .max_by_key(|folder| folder.components().count())
            .cloned()
            .unwrap_or_else(|| {
                find_project_root(
                    file,
                    &AmdConfig {
                        project_root: None,
                        ..config.clone()
                    },
                )
            });
        anchor_config(config, &base)
    }

    async fn ask(&self, options: &[String]) -> Option<String> {
        let actions = options
            .iter()
            .map(|option| MessageActionItem {
                title: option.clone(),
                properties: HashMap::new(),
            })
            .collect();
        match self
            .client
            .show_message_request(MessageType::INFO, "Choose a module", Some(actions))
            .await
        {
            Ok(choice) => choice.map(|item| item.title),
            Err(e) => {
                log::warn!("showMessageRequest failed: {}", e);
                None
            }
        }
    }

    /// Run `command` against `uri`, asking the client whenever a choice is
    /// needed, and send the result back as a workspace edit.
    async fn run_command(&self, command_name: &str, arguments: &[Value]) -> std::result::Result<String, String> {
        let (uri, position) = command_arguments(arguments)?;
        let rope = self
            .document_rope(&uri)
            .await
            .ok_or_else(|| format!("Cannot read document {}", uri))?;
        let text = rope.to_string();
        let offset = position.map(|p| position_to_byte_offset(&text, p));

        let command = Command::from_name(command_name, offset.unwrap_or(0))
            .ok_or_else(|| format!("Unknown command '{}'", command_name))?;
        if command.needs_offset() && offset.is_none() {
            return Err(format!("{} needs a cursor position", command_name));
        }

        let file_path = uri
            .to_file_path()
            .map_err(|_| format!("Not a file URI: {}", uri))?;
        let config = self.config_for(&file_path).await;
        let root = config
            .project_root
            .clone()
            .unwrap_or_else(|| find_project_root(&file_path, &config));
        let project = FsProject::new(root, &config);

        let mut answers: Vec<String> = Vec::new();
        loop {
            let mut buffer = RopeBuffer::new(rope.clone(), config.indentation.clone());
            let mut chooser = PresetChoice::with_answers(answers.clone());
            let result = {
                let mut ctx = OperationContext {
                    config: &config,
                    buffer: &mut buffer,
                    project: &project,
                    chooser: &mut chooser,
                    file_path: file_path.clone(),
                };
                run(command, &mut ctx)
            };

            match result {
                Ok(message) => {
                    let new_text = buffer.contents.to_string();
                    if new_text != text {
                        self.apply(&uri, &text, new_text).await?;
                    }
                    log::info!("{}: {}", command_name, message);
                    return Ok(message);
                }
                Err(DependencyError::NoChoiceMade)
                    if !chooser.offered.is_empty() && answers.len() < MAX_CHOICES =>
                {
                    match self.ask(&chooser.offered).await {
                        Some(answer) => answers.push(answer),
                        None => return Err(DependencyError::NoChoiceMade.to_string()),
                    }
                }
                Err(e) => return Err(e.to_string()),
            }
        }
    }

    async fn apply(&self, uri: &Url, old_text: &str, new_text: String) -> std::result::Result<(), String> {
        let edit = full_document_edit(uri, old_text, new_text);
        match self.client.apply_edit(edit).await {
            Ok(response) if response.applied => Ok(()),
            Ok(response) => Err(response
                .failure_reason
                .unwrap_or_else(|| "Edit was not applied".to_string())),
            Err(e) => Err(format!("workspace/applyEdit failed: {}", e)),
        }
    }
}

/// Split command arguments `[uri, position?]`.
fn command_arguments(arguments: &[Value]) -> std::result::Result<(Url, Option<Position>), String> {
    let uri = arguments
        .first()
        .and_then(|v| v.as_str())
        .ok_or_else(|| "Missing document URI argument".to_string())?;
    let uri = Url::parse(uri).map_err(|e| format!("Invalid URI '{}': {}", uri, e))?;
    let position = match arguments.get(1) {
        None | Some(Value::Null) => None,
        Some(value) => Some(
            serde_json::from_value::<Position>(value.clone())
                .map_err(|e| format!("Invalid position argument: {}", e))?,
        ),
    };
    Ok((uri, position))
}

/// Position just past the last character of `text`.
fn end_position(text: &str) -> Position {
    let line = text.matches('\n').count() as u32;
    let last_line = text.rsplit('\n').next().unwrap_or("");
    let character = last_line.chars().map(|c| c.len_utf16() as u32).sum();
    Position::new(line, character)
}

/// A workspace edit replacing the whole document.
fn full_document_edit(uri: &Url, old_text: &str, new_text: String) -> WorkspaceEdit {
    let edit = TextEdit {
        range: Range {
            start: Position::new(0, 0),
            end: end_position(old_text),
        },
        new_text,
    };
    WorkspaceEdit {
        changes: Some(HashMap::from([(uri.clone(), vec![edit])])),
        ..Default::default()
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        log::info!("Initializing amdinject");

        {
            let mut folders = self.workspace_folders.write().await;
            if let Some(workspace_folders) = params.workspace_folders {
                for folder in workspace_folders {
                    log::info!("Adding workspace folder: {}", folder.uri);
                    if let Ok(path) = folder.uri.to_file_path() {
                        folders.push(path);
                    }
                }
            } else if let Some(root_uri) = params.root_uri {
                log::info!("Adding root URI as workspace folder: {}", root_uri);
                if let Ok(path) = root_uri.to_file_path() {
                    folders.push(path);
                }
            }
        }

        if let Some(options) = params.initialization_options {
            match parse_config(&options) {
                Some(config) => *self.config.write().await = config,
                None => log::warn!("Ignoring initialization options that are not an object"),
            }
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::INCREMENTAL,
                )),
                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: COMMAND_NAMES.iter().map(|c| c.to_string()).collect(),
                    ..Default::default()
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: String::from("amdinject"),
                version: Some(String::from(env!("CARGO_PKG_VERSION"))),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        log::info!("amdinject initialized");
    }

    async fn shutdown(&self) -> Result<()> {
        log::info!("amdinject shutting down");
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        self.documents
            .insert(doc.uri, Document::new(&doc.text, Some(doc.version)));
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let Some(mut doc) = self.documents.get_mut(&uri) else {
            log::warn!("Change for unopened document {}", uri);
            return;
        };
        for change in params.content_changes {
            doc.apply_change(change);
        }
        doc.version = Some(params.text_document.version);
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        self.documents.remove(&params.text_document.uri);
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        match parse_config(&params.settings) {
            Some(config) => {
                log::trace!("Configuration changed");
                *self.config.write().await = config;
            }
            None => log::warn!("Failed to parse configuration from settings, keeping existing configuration"),
        }
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        match self.run_command(&params.command, &params.arguments).await {
            Ok(message) => {
                self.client.show_message(MessageType::INFO, &message).await;
                Ok(Some(Value::String(message)))
            }
            Err(message) => {
                log::warn!("{} failed: {}", params.command, message);
                self.client.show_message(MessageType::WARNING, &message).await;
                Ok(None)
            }
        }
    }
}

pub async fn start_lsp() -> anyhow::Result<()> {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(Backend::new);
    Server::new(stdin, stdout, socket).serve(service).await;

    Ok(())
}
