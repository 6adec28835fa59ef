//! Screen state for the bug and project listings.
//!
//! A board owns the records of one screen. Fetches are issued as
//! [`FetchTicket`]s; a completion is applied only when its ticket is the
//! most recent one and was issued for the screen context still on display,
//! so a slow response for a previous project or session is dropped.

use crate::listing::ListView;
use crate::normalize::{normalize_bugs, normalize_projects, RawBug, RawProject};
use crate::outcome::Invalidation;
use crate::project::ProjectRecord;
use crate::risk::{score_bugs, ScoredBug};
use crate::roles::Role;
use crate::session::Session;
use crate::types::DbId;

/// Fixed page size of the project grid.
pub const PROJECT_PAGE_SIZE: usize = 6;

// ---------------------------------------------------------------------------
// Stale-response guard
// ---------------------------------------------------------------------------

/// The token/role/project combination a screen is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenContext {
    pub token: String,
    pub role: Role,
    pub project_id: Option<DbId>,
}

impl ScreenContext {
    pub fn new(session: &Session, project_id: Option<DbId>) -> Self {
        Self {
            token: session.token.clone(),
            role: session.role,
            project_id,
        }
    }
}

/// Captured when a fetch is dispatched, presented when it completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    context: ScreenContext,
}

impl FetchTicket {
    pub fn context(&self) -> &ScreenContext {
        &self.context
    }
}

#[derive(Debug, Default)]
pub struct FetchGuard {
    generation: u64,
}

impl FetchGuard {
    /// Issue a ticket, superseding every earlier one.
    pub fn issue(&mut self, context: ScreenContext) -> FetchTicket {
        self.generation += 1;
        FetchTicket {
            generation: self.generation,
            context,
        }
    }

    pub fn is_current(&self, ticket: &FetchTicket, context: &ScreenContext) -> bool {
        ticket.generation == self.generation && &ticket.context == context
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Loaded,
    /// The last fetch failed; the screen offers a retry.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyResult {
    Applied,
    Stale,
}

// ---------------------------------------------------------------------------
// Bug board
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct BugBoard {
    context: ScreenContext,
    guard: FetchGuard,
    state: LoadState,
    view: ListView<ScoredBug>,
    projects: Vec<ProjectRecord>,
}

impl BugBoard {
    /// A board for `project_id`, or for every visible bug when `None`.
    pub fn new(session: &Session, project_id: Option<DbId>) -> Self {
        Self {
            context: ScreenContext::new(session, project_id),
            guard: FetchGuard::default(),
            state: LoadState::Loading,
            view: ListView::default(),
            projects: Vec::new(),
        }
    }

    pub fn context(&self) -> &ScreenContext {
        &self.context
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn view(&self) -> &ListView<ScoredBug> {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ListView<ScoredBug> {
        &mut self.view
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.state = LoadState::Loading;
        self.guard.issue(self.context.clone())
    }

    /// Point the board at another project (or all bugs) and start loading it.
    pub fn switch_project(&mut self, project_id: Option<DbId>) -> FetchTicket {
        self.context.project_id = project_id;
        self.begin_fetch()
    }

    /// Normalize and score the whole batch, then hand it to the list view.
    pub fn complete_fetch(&mut self, ticket: &FetchTicket, raw: Vec<RawBug>) -> ApplyResult {
        if !self.guard.is_current(ticket, &self.context) {
            tracing::debug!(project_id = ?ticket.context.project_id, "Dropping stale bug list response");
            return ApplyResult::Stale;
        }
        let scored = score_bugs(normalize_bugs(raw));
        tracing::debug!(count = scored.len(), "Bug list loaded");
        self.view.set_items(scored);
        self.state = LoadState::Loaded;
        ApplyResult::Applied
    }

    pub fn fail_fetch(&mut self, ticket: &FetchTicket) -> ApplyResult {
        if !self.guard.is_current(ticket, &self.context) {
            return ApplyResult::Stale;
        }
        self.state = LoadState::Failed;
        ApplyResult::Applied
    }

    /// Start a reload if the mutation touched the bug list.
    pub fn invalidate(&mut self, invalidation: Invalidation) -> Option<FetchTicket> {
        match invalidation {
            Invalidation::Bugs => Some(self.begin_fetch()),
            _ => None,
        }
    }

    /// Projects offered by the project selector.
    pub fn projects(&self) -> &[ProjectRecord] {
        &self.projects
    }

    pub fn set_projects(&mut self, raw: Vec<RawProject>) {
        self.projects = normalize_projects(raw);
    }

    pub fn project_title(&self) -> Option<&str> {
        let id = self.context.project_id?;
        self.projects
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.title.as_str())
    }

    /// Loaded successfully but the backend has no bugs for this scope.
    pub fn is_empty_state(&self) -> bool {
        self.state == LoadState::Loaded && self.view.is_empty()
    }

    /// QA may file bugs, and only inside a specific project.
    pub fn can_create_bug(&self) -> bool {
        self.context.role.can_create_bugs() && self.context.project_id.is_some()
    }

    pub fn find(&self, bug_id: DbId) -> Option<&ScoredBug> {
        self.view.items().iter().find(|b| b.bug.id == bug_id)
    }
}

// ---------------------------------------------------------------------------
// Project board
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ProjectBoard {
    context: ScreenContext,
    guard: FetchGuard,
    state: LoadState,
    view: ListView<ProjectRecord>,
}

impl ProjectBoard {
    pub fn new(session: &Session) -> Self {
        Self {
            context: ScreenContext::new(session, None),
            guard: FetchGuard::default(),
            state: LoadState::Loading,
            view: ListView::fixed(PROJECT_PAGE_SIZE),
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn view(&self) -> &ListView<ProjectRecord> {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ListView<ProjectRecord> {
        &mut self.view
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.state = LoadState::Loading;
        self.guard.issue(self.context.clone())
    }

    pub fn complete_fetch(&mut self, ticket: &FetchTicket, raw: Vec<RawProject>) -> ApplyResult {
        if !self.guard.is_current(ticket, &self.context) {
            return ApplyResult::Stale;
        }
        self.view.set_items(normalize_projects(raw));
        self.state = LoadState::Loaded;
        ApplyResult::Applied
    }

    pub fn fail_fetch(&mut self, ticket: &FetchTicket) -> ApplyResult {
        if !self.guard.is_current(ticket, &self.context) {
            return ApplyResult::Stale;
        }
        self.state = LoadState::Failed;
        ApplyResult::Applied
    }

    pub fn invalidate(&mut self, invalidation: Invalidation) -> Option<FetchTicket> {
        match invalidation {
            Invalidation::Projects => Some(self.begin_fetch()),
            _ => None,
        }
    }

    pub fn can_create_project(&self) -> bool {
        self.context.role.can_create_projects()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
