use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures::future::join_all;
use uuid::Uuid;

use crate::api::content_dto::GraphContentDto;
use crate::api::project_dto::{CreateFileDto, FileUpdateDto, ProjectDto, ProjectFileDto};
use crate::config::SessionConfig;
use crate::domain::graph::canonical::{read_content, snapshot_from_content};
use crate::domain::graph::node::Position;
use crate::domain::graph::templates::{DEFAULT_DROP_POSITION, NodeKind};
use crate::domain::modification_tracker::ModificationTracker;
use crate::domain::project_service::project_service_trait::ProjectService;
use crate::domain::session::canvas::{CanvasState, GraphAction, reduce};
use crate::domain::session::command::{CommandOutcome, EditorCommand};
use crate::domain::session::file_state::FileState;
use crate::domain::session::flush_schedule::FlushSchedule;
use crate::domain::session::open_file::{FileType, OpenFile};
use crate::domain::session::pending_save::{PendingSave, SaveOutcome};
use crate::domain::store::EditorStores;
use crate::domain::store::selection::Selection;
use crate::domain::utils::id::{FileId, NodeId, ProjectId};
use crate::error::{Error, Result};

#[derive(Debug)]
struct FileEntry {
    file: OpenFile,
    state: FileState,
    /// Ticket of the save currently in flight for this entry.
    pending_ticket: Option<u64>,
    /// Persisted graph entries that could not be read. Saving would drop them.
    unreadable: usize,
}

/// State of one editing session: the loaded project, the open files in tab order, the
/// canvas of the active file, and the per-file stores that keep background files alive.
#[derive(Debug)]
pub struct EditorSession {
    service: Arc<dyn ProjectService>,
    project: Option<ProjectDto>,
    files: Vec<FileEntry>,
    active: Option<FileId>,
    canvas: Option<CanvasState>,
    stores: EditorStores,
    tracker: ModificationTracker,
    flush_schedule: FlushSchedule,
    next_ticket: u64,
}

impl EditorSession {
    pub fn new(service: Arc<dyn ProjectService>, config: &SessionConfig) -> Self {
        EditorSession {
            service,
            project: None,
            files: Vec::new(),
            active: None,
            canvas: None,
            stores: EditorStores::new(),
            tracker: ModificationTracker::new(),
            flush_schedule: FlushSchedule::new(config.flush_interval()),
            next_ticket: 0,
        }
    }

    // ---------------------------------------------------------------------------------
    // Project
    // ---------------------------------------------------------------------------------

    pub async fn load_project(&mut self, project_id: &ProjectId) -> Result<&ProjectDto> {
        let project = self.service.get_project(project_id).await?;
        log::info!("Loaded project {:?} with {} files.", project.id, project.files.len());
        Ok(self.set_project(project))
    }

    pub async fn load_default_project(&mut self) -> Result<&ProjectDto> {
        let summary = self.service.get_default_project().await?;
        // The default-project endpoint does not always carry the file list.
        let project = if summary.files.is_empty() { self.service.get_project(&summary.id).await? } else { summary };
        log::info!("Loaded default project {:?} with {} files.", project.id, project.files.len());
        Ok(self.set_project(project))
    }

    /// Installs `project`. Switching to a different project closes every open file.
    pub fn set_project(&mut self, project: ProjectDto) -> &ProjectDto {
        let same_project = self.project.as_ref().is_some_and(|current| current.id == project.id);
        if !same_project {
            let open: Vec<FileId> = self.files.iter().map(|entry| entry.file.id.clone()).collect();
            for file_id in open {
                self.discard(&file_id);
            }
            self.active = None;
            self.canvas = None;
        }
        self.project.insert(project)
    }

    /// Creates a file in the loaded project and opens it. Graph files start with an
    /// empty content envelope.
    pub async fn create_file(&mut self, name: &str, file_type: FileType) -> Result<ProjectFileDto> {
        let project_id = self.project_id()?;
        let kind = file_type.as_str();
        let content = if file_type.is_graph() { Some(GraphContentDto::empty(Utc::now()).to_value()?) } else { None };

        let request = CreateFileDto {
            id: FileId::new(format!("{}-{}", kind, Uuid::new_v4().simple())),
            name: name.to_string(),
            file_type,
            path: format!("/files/{}s/{}", kind, slug(name)),
            content,
            thumbnail: None,
        };

        let created = self.service.create_file(&project_id, request).await?;
        log::info!("Created {} file {:?} in project {:?}.", kind, created.id, project_id);

        if let Some(project) = self.project.as_mut() {
            project.files.push(created.clone());
        }
        self.open_file(OpenFile::from(&created))?;
        Ok(created)
    }

    pub async fn rename_file(&mut self, file_id: &FileId, name: &str) -> Result<ProjectFileDto> {
        let project_id = self.project_id()?;
        let renamed = self.service.update_file(&project_id, file_id, FileUpdateDto::rename(name)).await?;

        if let Some(record) = self.project.as_mut().and_then(|project| project.file_mut(file_id)) {
            record.name = renamed.name.clone();
        }
        if let Some(entry) = self.entry_mut(file_id) {
            entry.file.name = renamed.name.clone();
        }
        Ok(renamed)
    }

    /// Deletes the file on the service, then closes it and drops it from the project.
    pub async fn delete_file(&mut self, file_id: &FileId) -> Result<()> {
        let project_id = self.project_id()?;
        self.service.delete_file(&project_id, file_id).await?;

        if self.is_open(file_id) {
            self.close_file(file_id)?;
        }
        if let Some(project) = self.project.as_mut() {
            project.files.retain(|file| &file.id != file_id);
        }
        log::info!("Deleted file {:?} from project {:?}.", file_id, project_id);
        Ok(())
    }

    /// Opens a file of the loaded project by id.
    pub fn open_project_file(&mut self, file_id: &FileId) -> Result<()> {
        let project = self.project.as_ref().ok_or(Error::NoProjectLoaded)?;
        let file = project.file(file_id).ok_or_else(|| Error::FileNotInProject(project.id.clone(), file_id.clone()))?;
        let file = OpenFile::from(file);
        self.open_file(file)
    }

    // ---------------------------------------------------------------------------------
    // Tabs
    // ---------------------------------------------------------------------------------

    /// Registers `file` and makes it active. A file that is already open is only refocused;
    /// its live state wins over the passed-in content.
    pub fn open_file(&mut self, file: OpenFile) -> Result<()> {
        if self.is_open(&file.id) {
            return self.switch_active_file(&file.id);
        }

        let mut unreadable = 0;
        if file.file_type.is_graph() {
            self.tracker.set_baseline(&file.id, file.content.as_ref())?;
            unreadable = read_content(file.content.as_ref()).rejected;
            if unreadable > 0 {
                log::warn!("{:?} holds {} unreadable graph entries; saving it is disabled.", file.id, unreadable);
            }
        }

        let file_id = file.id.clone();
        log::debug!("Opening {:?} ({}).", file_id, file.file_type.as_str());
        self.files.push(FileEntry { file, state: FileState::Uninitialized, pending_ticket: None, unreadable });
        self.activate(&file_id)
    }

    pub fn switch_active_file(&mut self, file_id: &FileId) -> Result<()> {
        if !self.is_open(file_id) {
            return Err(Error::FileNotOpen(file_id.clone()));
        }
        self.activate(file_id)
    }

    /// Closes `file_id` and drops every store entry it owns. If it was active, the most
    /// recently opened remaining file becomes active.
    pub fn close_file(&mut self, file_id: &FileId) -> Result<()> {
        if !self.is_open(file_id) {
            return Err(Error::FileNotOpen(file_id.clone()));
        }

        let was_active = self.active.as_ref() == Some(file_id);
        self.discard(file_id);

        if was_active {
            self.active = None;
            self.canvas = None;
            if let Some(next) = self.files.last().map(|entry| entry.file.id.clone()) {
                self.activate(&next)?;
            }
        }
        Ok(())
    }

    fn discard(&mut self, file_id: &FileId) {
        if let Some(index) = self.files.iter().position(|entry| &entry.file.id == file_id) {
            let entry = self.files.remove(index);
            if entry.state.is_saving() {
                log::info!("Closed {:?} while a save was in flight; the save will still complete.", file_id);
            }
        }
        self.stores.remove_all(file_id);
        self.tracker.forget(file_id);
    }

    fn activate(&mut self, file_id: &FileId) -> Result<()> {
        if self.active.as_ref() == Some(file_id) {
            return Ok(());
        }

        let (file_type, content) = {
            let entry = self.entry(file_id).ok_or_else(|| Error::FileNotOpen(file_id.clone()))?;
            (entry.file.file_type, entry.file.content.clone())
        };

        self.flush();
        if let Some(previous) = self.active.take() {
            if let Some(entry) = self.entry_mut(&previous) {
                if !entry.state.is_saving() {
                    entry.state = FileState::Background;
                }
            }
        }
        self.canvas = None;

        if let Some(entry) = self.entry_mut(file_id) {
            if !entry.state.is_saving() {
                entry.state = FileState::Initializing;
            }
        }

        if file_type.is_graph() {
            let canvas = self.restore_canvas(file_id, content.as_ref());
            self.stores.store(file_id, &canvas.snapshot, canvas.viewport, &canvas.selection);
            self.canvas = Some(canvas);
        }
        self.active = Some(file_id.clone());
        self.refresh_dirty(file_id)?;

        if let Some(entry) = self.entry_mut(file_id) {
            if !entry.state.is_saving() {
                entry.state = FileState::Active;
            }
        }
        log::debug!("{:?} is now active.", file_id);
        Ok(())
    }

    /// Stores first, persisted content second.
    fn restore_canvas(&self, file_id: &FileId, content: Option<&serde_json::Value>) -> CanvasState {
        let snapshot = match self.stores.graph(file_id) {
            Some(snapshot) => snapshot.clone(),
            None => {
                let seeded = snapshot_from_content(content);
                let dangling = seeded.dangling_edges().len();
                if dangling > 0 {
                    log::warn!("{:?} was saved with {} edges pointing at missing nodes.", file_id, dangling);
                }
                seeded
            }
        };

        let viewport = self.stores.viewport(file_id).copied().unwrap_or_default();
        let mut selection = self.stores.selection(file_id).cloned().unwrap_or_default();
        selection.retain_existing(&snapshot);

        CanvasState { snapshot, viewport, selection }
    }

    // ---------------------------------------------------------------------------------
    // Canvas
    // ---------------------------------------------------------------------------------

    /// Copies the active canvas into the stores. Returns whether anything was copied.
    pub fn flush(&mut self) -> bool {
        let (Some(file_id), Some(canvas)) = (self.active.as_ref(), self.canvas.as_ref()) else {
            return false;
        };
        self.stores.store(file_id, &canvas.snapshot, canvas.viewport, &canvas.selection);
        self.flush_schedule.mark(Instant::now());
        true
    }

    /// Periodic flush; does nothing until the flush interval has passed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.flush_schedule.is_due(now) {
            return false;
        }
        let flushed = self.flush();
        self.flush_schedule.mark(now);
        if flushed {
            tracing::trace!(file_id = ?self.active, "canvas flushed");
        }
        flushed
    }

    pub fn apply(&mut self, action: GraphAction) -> Result<()> {
        let file_id = self.active.clone().ok_or(Error::NoActiveFile)?;
        let canvas = self.canvas.as_ref().ok_or_else(|| Error::NotAGraphFile(file_id.clone()))?;

        let changes_graph = action.changes_graph();
        let next = reduce(canvas, action)?;
        self.canvas = Some(next);

        if changes_graph {
            self.refresh_dirty(&file_id)?;
        }
        Ok(())
    }

    /// Drops a stock node on the active canvas.
    pub fn add_node(&mut self, kind: NodeKind, position: Option<Position>) -> Result<NodeId> {
        let node = kind.build(position.unwrap_or(DEFAULT_DROP_POSITION));
        let node_id = node.id.clone();
        self.apply(GraphAction::AddNode(node))?;
        Ok(node_id)
    }

    fn refresh_dirty(&mut self, file_id: &FileId) -> Result<()> {
        let is_graph = match self.entry(file_id) {
            Some(entry) => entry.file.file_type.is_graph(),
            None => return Ok(()),
        };
        if !is_graph {
            return Ok(());
        }

        let live = match (&self.active, &self.canvas) {
            (Some(active), Some(canvas)) if active == file_id => Some(&canvas.snapshot),
            _ => self.stores.graph(file_id),
        };
        let dirty = match live {
            Some(snapshot) => self.tracker.evaluate(file_id, snapshot)?,
            None => self.tracker.evaluate(file_id, &Default::default())?,
        };

        if let Some(entry) = self.entry_mut(file_id) {
            entry.file.is_modified = dirty;
        }
        Ok(())
    }

    // ---------------------------------------------------------------------------------
    // Saving
    // ---------------------------------------------------------------------------------

    /// Captures the current graph of `file_id` and marks the file as saving.
    ///
    /// Edits made after this call are not part of the returned request.
    pub fn begin_save(&mut self, file_id: &FileId) -> Result<PendingSave> {
        let project_id = self.project_id()?;
        let entry = self.entry(file_id).ok_or_else(|| Error::FileNotOpen(file_id.clone()))?;
        if !entry.file.file_type.is_graph() {
            return Err(Error::NotAGraphFile(file_id.clone()));
        }
        if entry.state.is_saving() {
            return Err(Error::SaveInProgress(file_id.clone()));
        }
        if entry.unreadable > 0 {
            return Err(Error::UnreadableContent(file_id.clone(), entry.unreadable));
        }

        if self.active.as_ref() == Some(file_id) {
            self.flush();
        }
        let snapshot = self.stores.graph(file_id).cloned().unwrap_or_default();
        let content = GraphContentDto::capture(&snapshot, Utc::now()).to_value()?;

        self.next_ticket += 1;
        let ticket = self.next_ticket;
        if let Some(entry) = self.entry_mut(file_id) {
            entry.state = FileState::Saving;
            entry.pending_ticket = Some(ticket);
        }

        Ok(PendingSave {
            ticket,
            project_id,
            file_id: file_id.clone(),
            content,
            node_count: snapshot.nodes.len(),
            edge_count: snapshot.edges.len(),
            started_at: Instant::now(),
        })
    }

    /// Applies the result of a save started with [`EditorSession::begin_save`].
    ///
    /// If the file was closed in the meantime, only the project record is updated. A file
    /// reopened while the save was in flight takes the saved content as its new baseline.
    pub fn complete_save(&mut self, outcome: SaveOutcome) -> Result<ProjectFileDto> {
        let SaveOutcome { pending, result } = outcome;
        let file_id = pending.file_id.clone();
        let elapsed_ms = u64::try_from(pending.started_at.elapsed().as_millis()).unwrap_or(u64::MAX);

        let is_active = self.active.as_ref() == Some(&file_id);
        let owns_entry = match self.entry_mut(&file_id) {
            Some(entry) if entry.pending_ticket == Some(pending.ticket) => {
                entry.pending_ticket = None;
                entry.state = if is_active { FileState::Active } else { FileState::Background };
                true
            }
            _ => false,
        };

        match result {
            Ok(saved) => {
                if let Some(record) = self.project.as_mut().and_then(|project| project.file_mut(&file_id)) {
                    record.content = Some(pending.content.clone());
                    record.updated_at = saved.updated_at;
                }

                if let Some(entry) = self.entry_mut(&file_id) {
                    entry.file.content = Some(pending.content.clone());
                    entry.unreadable = 0;
                    if !owns_entry {
                        log::info!("Saved {:?} after it was reopened; rebasing the open copy.", file_id);
                    }
                    self.tracker.set_baseline(&file_id, Some(&pending.content))?;
                    self.refresh_dirty(&file_id)?;
                } else {
                    log::info!("Saved {:?} after it was closed; only the project record was updated.", file_id);
                }

                tracing::info!(
                    file_id = %file_id,
                    nodes = pending.node_count,
                    edges = pending.edge_count,
                    elapsed_ms,
                    still_modified = self.is_dirty(&file_id),
                    "save completed"
                );
                Ok(saved)
            }
            Err(error) => {
                log::error!("Failed to save {:?}: {}", file_id, error);
                tracing::warn!(file_id = %file_id, elapsed_ms, error = %error, "save failed");
                Err(error)
            }
        }
    }

    /// Saves one file and waits for the result.
    pub async fn save(&mut self, file_id: &FileId) -> Result<ProjectFileDto> {
        let pending = self.begin_save(file_id)?;
        let service = Arc::clone(&self.service);
        let outcome = pending.execute(service.as_ref()).await;
        self.complete_save(outcome)
    }

    pub async fn save_active(&mut self) -> Result<ProjectFileDto> {
        let file_id = self.active.clone().ok_or(Error::NoActiveFile)?;
        self.save(&file_id).await
    }

    /// Saves every modified graph file concurrently.
    pub async fn save_all(&mut self) -> Vec<(FileId, Result<ProjectFileDto>)> {
        self.flush();
        let dirty: Vec<FileId> = self
            .files
            .iter()
            .filter(|entry| entry.file.file_type.is_graph() && entry.file.is_modified)
            .map(|entry| entry.file.id.clone())
            .collect();

        let mut results = Vec::new();
        let mut pending = Vec::new();
        for file_id in dirty {
            match self.begin_save(&file_id) {
                Ok(save) => pending.push(save),
                Err(error) => results.push((file_id, Err(error))),
            }
        }

        let service = Arc::clone(&self.service);
        let outcomes = join_all(pending.into_iter().map(|save| save.execute(service.as_ref()))).await;
        for outcome in outcomes {
            let file_id = outcome.pending.file_id.clone();
            results.push((file_id, self.complete_save(outcome)));
        }
        results
    }

    // ---------------------------------------------------------------------------------
    // Commands
    // ---------------------------------------------------------------------------------

    pub async fn dispatch(&mut self, command: EditorCommand) -> Result<CommandOutcome> {
        log::trace!("Dispatching {:?}.", command);
        match command {
            EditorCommand::Save => {
                let saved = self.save_active().await?;
                Ok(CommandOutcome::Saved { saved: vec![saved.id], failed: Vec::new() })
            }
            EditorCommand::SaveFile(file_id) => {
                let saved = self.save(&file_id).await?;
                Ok(CommandOutcome::Saved { saved: vec![saved.id], failed: Vec::new() })
            }
            EditorCommand::SaveAll => {
                let mut saved = Vec::new();
                let mut failed = Vec::new();
                for (file_id, result) in self.save_all().await {
                    match result {
                        Ok(_) => saved.push(file_id),
                        Err(error) => failed.push((file_id, error)),
                    }
                }
                Ok(CommandOutcome::Saved { saved, failed })
            }
            EditorCommand::AddNode { kind, position } => self.add_node(kind, position).map(CommandOutcome::NodeAdded),
            EditorCommand::Apply(action) => self.apply(action).map(|_| CommandOutcome::Done),
            EditorCommand::Switch(file_id) => self.switch_active_file(&file_id).map(|_| CommandOutcome::Done),
            EditorCommand::Close(file_id) => self.close_file(&file_id).map(|_| CommandOutcome::Done),
            EditorCommand::Flush => {
                self.flush();
                Ok(CommandOutcome::Done)
            }
        }
    }

    // ---------------------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------------------

    pub fn project(&self) -> Option<&ProjectDto> {
        self.project.as_ref()
    }

    fn project_id(&self) -> Result<ProjectId> {
        self.project.as_ref().map(|project| project.id.clone()).ok_or(Error::NoProjectLoaded)
    }

    pub fn service(&self) -> &Arc<dyn ProjectService> {
        &self.service
    }

    /// Open files in tab order.
    pub fn open_files(&self) -> impl Iterator<Item = &OpenFile> {
        self.files.iter().map(|entry| &entry.file)
    }

    pub fn file(&self, file_id: &FileId) -> Option<&OpenFile> {
        self.entry(file_id).map(|entry| &entry.file)
    }

    pub fn is_open(&self, file_id: &FileId) -> bool {
        self.entry(file_id).is_some()
    }

    pub fn file_state(&self, file_id: &FileId) -> FileState {
        self.entry(file_id).map(|entry| entry.state).unwrap_or(FileState::Uninitialized)
    }

    pub fn active_file_id(&self) -> Option<&FileId> {
        self.active.as_ref()
    }

    pub fn canvas(&self) -> Option<&CanvasState> {
        self.canvas.as_ref()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.canvas.as_ref().map(|canvas| &canvas.selection)
    }

    pub fn stores(&self) -> &EditorStores {
        &self.stores
    }

    pub fn is_dirty(&self, file_id: &FileId) -> bool {
        self.tracker.is_dirty(file_id)
    }

    pub fn flush_interval(&self) -> std::time::Duration {
        self.flush_schedule.interval()
    }

    fn entry(&self, file_id: &FileId) -> Option<&FileEntry> {
        self.files.iter().find(|entry| &entry.file.id == file_id)
    }

    fn entry_mut(&mut self, file_id: &FileId) -> Option<&mut FileEntry> {
        self.files.iter_mut().find(|entry| &entry.file.id == file_id)
    }
}

fn slug(name: &str) -> String {
    let slug: String = name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    let slug = slug.split('-').filter(|part| !part.is_empty()).collect::<Vec<_>>().join("-");
    if slug.is_empty() { "untitled".to_string() } else { slug }
}
