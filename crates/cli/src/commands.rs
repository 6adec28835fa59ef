//! Command dispatch.
//!
//! Each command drives the same screen state the dashboard uses (boards,
//! bug details, forms) and prints the rendered result to stdout.

use std::path::Path;

use anyhow::Context as _;
use bugdesk_client::api::{AssignmentResult, BugdeskApi};
use bugdesk_client::config::ClientConfig;
use bugdesk_client::error::ApiError;
use bugdesk_core::board::{ApplyResult, BugBoard, FetchTicket, ProjectBoard};
use bugdesk_core::bug::BugStatus;
use bugdesk_core::detail::{BugDetail, ExtractionOutcome};
use bugdesk_core::error::CoreError;
use bugdesk_core::forms::{NewBugForm, NewProjectForm, ProfileUpdate, SignupForm};
use bugdesk_core::listing::{validate_page_size, ListView, Searchable};
use bugdesk_core::outcome::Invalidation;
use bugdesk_core::risk::ScoredBug;
use bugdesk_core::session::Session;
use bugdesk_core::types::DbId;
use bugdesk_core::user::split_by_role;
use bugdesk_ocr::attachment::compress_for_upload;
use bugdesk_ocr::extractor::TextExtractor;
use bugdesk_ocr::recognizer::TesseractCli;

use crate::args::{BugsCommand, Cli, Command, PageArgs, ProfileCommand, ProjectsCommand};
use crate::render;
use crate::store::{resolve_session_path, SessionStore};

/// Shared state for one invocation.
struct Context {
    api: BugdeskApi,
    store: SessionStore,
}

impl Context {
    /// The stored session; commands behind login fail without one.
    fn session(&self) -> anyhow::Result<Session> {
        self.store.load()?.ok_or_else(|| {
            CoreError::Unauthorized("Not logged in. Run `bugdesk login` first.".into()).into()
        })
    }

    fn authed(&self) -> anyhow::Result<(Session, BugdeskApi)> {
        let session = self.session()?;
        let api = self.api.clone().with_session(session.clone());
        Ok((session, api))
    }
}

/// Gateway failures are shown as their single user-facing message; the
/// full error goes to the log.
fn friendly(error: ApiError) -> anyhow::Error {
    tracing::debug!(error = ?error, "Request failed");
    anyhow::anyhow!(error.user_message())
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match cli.api_url {
        Some(url) => ClientConfig::new(url),
        None => ClientConfig::from_env(),
    };
    let store = SessionStore::new(resolve_session_path(cli.session_file.as_deref())?);
    let mut ctx = Context {
        api: BugdeskApi::new(&config),
        store,
    };

    match cli.command {
        Command::Login { email, password } => login(&mut ctx, &email, &password).await,
        Command::Logout => logout(&ctx),
        Command::Signup(args) => {
            let form = SignupForm {
                name: args.name,
                phone: args.phone,
                email: args.email,
                password: args.password,
                confirm_password: args.confirm_password,
                role: args.role,
            };
            signup(&ctx, &form).await
        }
        Command::Me => me(&ctx).await,
        Command::Profile(ProfileCommand::Set { field, value }) => {
            let update = ProfileUpdate::new(field, value)?;
            update_profile(&ctx, &update).await
        }
        Command::Projects(cmd) => projects(&ctx, cmd).await,
        Command::Bugs(cmd) => bugs(&ctx, cmd).await,
        Command::Developers => developers(&ctx).await,
        Command::Users => users(&ctx).await,
    }
}

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

async fn login(ctx: &mut Context, email: &str, password: &str) -> anyhow::Result<()> {
    let session = ctx.api.sign_in(email, password).await.map_err(friendly)?;
    ctx.store
        .save(&session)
        .context("Logged in, but the session could not be saved")?;
    println!("Logged in as {}.", session.role);
    Ok(())
}

fn logout(ctx: &Context) -> anyhow::Result<()> {
    if ctx.store.clear()? {
        println!("Logged out.");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}

async fn signup(ctx: &Context, form: &SignupForm) -> anyhow::Result<()> {
    ctx.api.signup(form).await.map_err(friendly)?;
    println!("Account created. You can now log in.");
    Ok(())
}

async fn me(ctx: &Context) -> anyhow::Result<()> {
    let (_, api) = ctx.authed()?;
    let profile = api.me().await.map_err(friendly)?;
    print!("{}", render::profile(&profile));
    Ok(())
}

async fn update_profile(ctx: &Context, update: &ProfileUpdate) -> anyhow::Result<()> {
    let (_, api) = ctx.authed()?;
    let outcome = api.update_profile(update).await.map_err(friendly)?;
    println!("{}", update.success_message());
    if outcome.invalidates == Invalidation::Profile {
        let profile = api.me().await.map_err(friendly)?;
        print!("{}", render::profile(&profile));
    }
    Ok(())
}

async fn developers(ctx: &Context) -> anyhow::Result<()> {
    let (_, api) = ctx.authed()?;
    let developers = api.list_developers().await.map_err(friendly)?;
    print!("{}", render::user_list("Developers", &developers));
    Ok(())
}

async fn users(ctx: &Context) -> anyhow::Result<()> {
    let (_, api) = ctx.authed()?;
    let all = api.list_users().await.map_err(friendly)?;
    let (qa, developers) = split_by_role(all);
    print!("{}", render::user_list("QA", &qa));
    print!("{}", render::user_list("Developers", &developers));
    Ok(())
}

// ---------------------------------------------------------------------------
// Listing helpers
// ---------------------------------------------------------------------------

/// Apply `--search` and `--page` to a loaded view.
pub fn apply_paging<T: Searchable>(view: &mut ListView<T>, paging: &PageArgs) -> Result<(), CoreError> {
    view.set_query(paging.search.clone());
    if paging.page != 1 && !view.go_to(paging.page) {
        return Err(CoreError::Validation(format!(
            "Page {} is out of range; there are {} page(s)",
            paging.page,
            view.total_pages()
        )));
    }
    Ok(())
}

async fn fetch_projects(api: &BugdeskApi, board: &mut ProjectBoard, ticket: FetchTicket) -> ApplyResult {
    match api.list_projects().await {
        Ok(raw) => board.complete_fetch(&ticket, raw),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch projects");
            board.fail_fetch(&ticket)
        }
    }
}

/// On failure the board is put into its failed state and the error is
/// handed back for callers that cannot render that state.
async fn fetch_bugs(
    api: &BugdeskApi,
    board: &mut BugBoard,
    ticket: FetchTicket,
) -> Result<ApplyResult, ApiError> {
    match api.list_bugs(ticket.context().project_id).await {
        Ok(raw) => Ok(board.complete_fetch(&ticket, raw)),
        Err(e) => {
            tracing::warn!(error = %e, project_id = ?ticket.context().project_id, "Failed to fetch bugs");
            board.fail_fetch(&ticket);
            Err(e)
        }
    }
}

/// A bug board with the project selector filled in when scoped to a
/// project, plus the outcome of the bug list fetch.
async fn load_bug_board(
    api: &BugdeskApi,
    session: &Session,
    project: Option<DbId>,
) -> (BugBoard, Result<ApplyResult, ApiError>) {
    let mut board = BugBoard::new(session, project);
    if project.is_some() {
        match api.list_projects().await {
            Ok(raw) => board.set_projects(raw),
            Err(e) => tracing::warn!(error = %e, "Failed to fetch project list"),
        }
    }
    let ticket = board.begin_fetch();
    let fetched = fetch_bugs(api, &mut board, ticket).await;
    (board, fetched)
}

/// Load the list and pick one bug from it. A failed fetch is reported as
/// itself, not as a missing bug.
async fn select_bug(
    api: &BugdeskApi,
    session: &Session,
    project: Option<DbId>,
    bug_id: DbId,
) -> anyhow::Result<ScoredBug> {
    let (board, fetched) = load_bug_board(api, session, project).await;
    fetched.map_err(friendly)?;
    let bug = board.find(bug_id).cloned().ok_or(CoreError::NotFound {
        entity: "bug",
        id: bug_id,
    })?;
    Ok(bug)
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

async fn projects(ctx: &Context, cmd: ProjectsCommand) -> anyhow::Result<()> {
    let (session, api) = ctx.authed()?;
    let mut board = ProjectBoard::new(&session);

    match cmd {
        ProjectsCommand::List { paging } => {
            let ticket = board.begin_fetch();
            fetch_projects(&api, &mut board, ticket).await;
            apply_paging(board.view_mut(), &paging)?;
            print!("{}", render::project_board(&board));
        }
        ProjectsCommand::Create {
            title,
            description,
            qa_ids,
            developer_ids,
        } => {
            if !board.can_create_project() {
                return Err(CoreError::Forbidden("Only managers can create projects".into()).into());
            }
            let form = NewProjectForm {
                title,
                description,
                qa_ids,
                developer_ids,
            };
            let outcome = api.create_project(&form).await.map_err(friendly)?;
            let created = &outcome.value;
            println!("Project '{}' created (id {}).", created.project.title, created.project.id);
            if !created.failed_assignments.is_empty() {
                println!(
                    "Some members could not be assigned: {:?}",
                    created.failed_assignments
                );
            }
            if let Some(ticket) = board.invalidate(outcome.invalidates) {
                fetch_projects(&api, &mut board, ticket).await;
                println!();
                print!("{}", render::project_board(&board));
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Bugs
// ---------------------------------------------------------------------------

async fn bugs(ctx: &Context, cmd: BugsCommand) -> anyhow::Result<()> {
    let (session, api) = ctx.authed()?;

    match cmd {
        BugsCommand::List {
            project,
            paging,
            page_size,
        } => {
            let (mut board, _) = load_bug_board(&api, &session, project).await;
            if let Some(size) = page_size {
                validate_page_size(size)?;
                board.view_mut().set_page_size(size)?;
            }
            apply_paging(board.view_mut(), &paging)?;
            print!("{}", render::bug_board(&board));
        }

        BugsCommand::Show { id, project } => {
            let scored = select_bug(&api, &session, project, id).await?;
            let mut detail = BugDetail::new(scored.bug);
            match api.bug_assignees(id).await {
                Ok(assignees) => detail.set_assignees(assignees),
                Err(e) => tracing::warn!(bug_id = id, error = %e, "Failed to load assignees"),
            }
            print!("{}", render::bug_detail(&detail));
            println!("\nRisk: {} (score {})", scored.risk.label, scored.risk.score);
        }

        BugsCommand::Create {
            project,
            title,
            description,
            deadline,
            kind,
            screenshot,
            developer_ids,
        } => {
            let board = BugBoard::new(&session, Some(project));
            if !board.can_create_bug() {
                return Err(CoreError::Forbidden("Only QA can create bugs".into()).into());
            }
            let screenshot_url = match screenshot {
                Some(path) => Some(attach_screenshot(&path).await?),
                None => None,
            };
            let form = NewBugForm {
                title,
                description,
                deadline,
                kind,
                screenshot_url,
                developer_ids,
            };
            let outcome = api.create_bug(project, &form).await.map_err(friendly)?;
            match outcome.value.bug_id {
                Some(id) => println!("Bug #{id} created."),
                None => println!("Bug created."),
            }
            if let AssignmentResult::Failed(reason) = &outcome.value.assignment {
                println!("Bug created, but assignments failed: {reason}");
            }
        }

        BugsCommand::Status {
            id,
            status,
            project,
        } => {
            if !session.role.can_update_status() {
                return Err(CoreError::Forbidden("Only developers can update bug status".into()).into());
            }
            let mut detail = BugDetail::new(select_bug(&api, &session, project, id).await?.bug);
            update_status(&api, &mut detail, status).await?;
            println!("Bug #{id} is now {}.", render::status_badge(detail.bug().status));
        }

        BugsCommand::Ocr { id, project } => {
            let mut detail = BugDetail::new(select_bug(&api, &session, project, id).await?.bug);
            let ticket = detail.begin_extraction()?;
            let extractor = TextExtractor::new(TesseractCli::from_env());
            let result = extractor.extract(&ticket.screenshot_url).await;
            match detail.finish_extraction(&ticket, result) {
                ExtractionOutcome::Extracted(text) if text.is_empty() => {
                    println!("No text found in the screenshot.");
                }
                ExtractionOutcome::Extracted(text) => println!("{text}"),
                ExtractionOutcome::Failed { notice } => anyhow::bail!(notice),
                ExtractionOutcome::Stale => {}
            }
        }
    }
    Ok(())
}

async fn update_status(api: &BugdeskApi, detail: &mut BugDetail, status: BugStatus) -> anyhow::Result<()> {
    detail.set_status_draft(status);
    let status = detail.begin_status_update()?;
    match api.update_status(detail.bug().id, status).await {
        Ok(_) => {
            detail.finish_status_update(true);
            Ok(())
        }
        Err(e) => {
            detail.finish_status_update(false);
            Err(friendly(e))
        }
    }
}

/// Read and compress a screenshot into the data URI sent with the bug.
async fn attach_screenshot(path: &Path) -> anyhow::Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Could not read screenshot {}", path.display()))?;
    let compressed = compress_for_upload(&bytes)
        .with_context(|| format!("{} is not a supported image", path.display()))?;
    Ok(compressed.data_uri())
}
