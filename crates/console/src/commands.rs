//! Command implementations for the `eduhub-console` binary.

use std::sync::Arc;

use eduhub_client::{Collection, StoredAccessToken};
use eduhub_console::notifications::RealtimeHandler;
use eduhub_console::screens::{DashboardSummary, ListScreen};
use eduhub_console::store::{Action, StoredReview};
use eduhub_console::workflows::approval::ApprovalWorkflow;
use eduhub_console::workflows::course_members::MemberDialog;
use eduhub_console::workflows::courses::CourseAdmin;
use eduhub_console::workflows::refetch;
use eduhub_console::{AppState, ConsoleError};
use eduhub_core::approval::ResolveAction;
use eduhub_core::diff::{changed_only, diff_records, DiffStatus};
use eduhub_core::listing::Listable;
use eduhub_core::messages;
use eduhub_core::models::{Certification, Degree, Institution, Lecturer, LecturerSummary, Partner};
use eduhub_core::requests::LoginRequest;
use eduhub_core::review::Reviewable;
use eduhub_core::status::{ApprovalStatus, EntityKind, RequestKind};
use eduhub_core::types::DbId;
use eduhub_events::{ConsoleEvent, Published, RealtimeListener};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::args::{
    Commands, CourseAction, CoursesArgs, DiffArgs, ListArgs, MemberAction, MembersArgs,
    PendingArgs,
};

/// Run `$f::<Entity>(args..)` for the entity type matching `$kind`.
macro_rules! for_kind {
    ($kind:expr, $f:ident ( $($arg:expr),* $(,)? )) => {
        match $kind {
            EntityKind::Partner => $f::<Partner>($($arg),*).await,
            EntityKind::Lecturer => $f::<Lecturer>($($arg),*).await,
            EntityKind::Institution => $f::<Institution>($($arg),*).await,
            EntityKind::Degree => $f::<Degree>($($arg),*).await,
            EntityKind::Certification => $f::<Certification>($($arg),*).await,
        }
    };
}

pub async fn execute(state: &AppState, command: Commands) -> Result<(), ConsoleError> {
    match command {
        Commands::Login(args) => {
            let credentials = LoginRequest {
                username: args.username,
                password: args.password,
            };
            state
                .client
                .login(&credentials)
                .await
                .map_err(|e| state.report(e))?;
            whoami(state).await
        }
        Commands::Logout => {
            let result = state.client.logout().await;
            state.dispatch(Action::Reset);
            result.map_err(|e| state.report(e))
        }
        Commands::Whoami => whoami(state).await,
        Commands::Pending(args) => for_kind!(args.kind, pending(state, &args)),
        Commands::Approve(args) => {
            let request = RequestKind::from(args.request);
            for_kind!(args.kind, resolve(state, args.id, request, ResolveAction::Approve, None))
        }
        Commands::Reject(args) => {
            let request = RequestKind::from(args.target.request);
            let reason = Some(args.reason.as_str());
            for_kind!(
                args.target.kind,
                resolve(state, args.target.id, request, ResolveAction::Reject, reason)
            )
        }
        Commands::Diff(args) => for_kind!(args.kind, diff(state, &args)),
        Commands::Courses(args) => courses(state, args).await,
        Commands::Members(args) => members(state, args).await,
        Commands::Dashboard => dashboard(state).await,
        // Needs the live event stream; handled by `listen`.
        Commands::Listen => Ok(()),
    }
}

async fn whoami(state: &AppState) -> Result<(), ConsoleError> {
    let account = state.client.me().await.map_err(|e| state.report(e))?;
    println!("{} (#{}) {:?}", account.username, account.id, account.role);
    state.dispatch(Action::SetAccount(Some(account)));
    Ok(())
}

fn screen(list: &ListArgs, status: Option<ApprovalStatus>) -> ListScreen {
    let mut screen = ListScreen::new();
    screen.set_search(list.search.clone());
    screen.set_status(status);
    screen.set_page_size(list.page_size);
    screen.set_page(list.page);
    screen
}

fn print_footer(page: usize, page_count: usize, total: usize) {
    println!("-- trang {page}/{page_count}, {total} mục");
}

async fn pending<T: StoredReview + Listable>(
    state: &AppState,
    args: &PendingArgs,
) -> Result<(), ConsoleError> {
    let request = RequestKind::from(args.request);
    let collection = match (args.canonical, request) {
        (true, _) => Collection::Canonical,
        (false, RequestKind::Create) => Collection::PendingCreate,
        (false, RequestKind::Update) => Collection::PendingUpdate,
    };
    refetch::<T>(state, collection)
        .await
        .map_err(|e| state.report(e))?;

    let screen = screen(&args.list, args.status.map(Into::into));

    let snapshot = state.store.snapshot();
    let slice = T::slice(&snapshot);
    match collection {
        Collection::PendingUpdate => {
            let page = screen.view(&slice.pending_updates);
            for req in &page.items {
                println!(
                    "#{:<6} {:<40} (bản ghi #{})",
                    req.id,
                    req.requested.display_name(),
                    req.current.id()
                );
            }
            print_footer(page.page, page.page_count, page.total);
        }
        _ => {
            let items = if collection == Collection::Canonical {
                &slice.canonical
            } else {
                &slice.pending_creates
            };
            let page = screen.view(items);
            for item in &page.items {
                println!(
                    "#{:<6} {:<40} {}",
                    item.id(),
                    item.display_name(),
                    item.status().label()
                );
            }
            print_footer(page.page, page.page_count, page.total);
        }
    }
    Ok(())
}

async fn resolve<T: StoredReview>(
    state: &AppState,
    id: DbId,
    request: RequestKind,
    action: ResolveAction,
    reason: Option<&str>,
) -> Result<(), ConsoleError> {
    let workflow = ApprovalWorkflow::<T>::new(state.clone(), request);
    if workflow.config().notify_on_approve && action == ResolveAction::Approve {
        // The notification address comes from the pending list.
        refetch::<T>(state, Collection::PendingCreate)
            .await
            .map_err(|e| state.report(e))?;
    }
    let resolved = workflow.resolve_id(id, action, reason).await?;
    tracing::info!(
        kind = %T::KIND,
        id = resolved.id,
        action = %resolved.action,
        email_queued = resolved.email_task.is_some(),
        "Request resolved",
    );
    Ok(())
}

async fn diff<T: StoredReview>(state: &AppState, args: &DiffArgs) -> Result<(), ConsoleError> {
    refetch::<T>(state, Collection::PendingUpdate)
        .await
        .map_err(|e| state.report(e))?;

    let snapshot = state.store.snapshot();
    let Some(request) = T::slice(&snapshot)
        .pending_updates
        .iter()
        .find(|r| r.id == args.id)
    else {
        return Err(state.report(ConsoleError::NotAllowed(messages::NOT_FOUND)));
    };

    let changes = diff_records(&request.current, &request.requested);
    let rows: Vec<_> = if args.all {
        changes.iter().collect()
    } else {
        changed_only(&changes)
    };
    for change in rows {
        let marker = match change.status {
            DiffStatus::Added => "+",
            DiffStatus::Removed => "-",
            DiffStatus::Changed => "~",
            DiffStatus::Unchanged => " ",
        };
        println!(
            "{marker} {:<28} {:<30} → {}",
            change.label,
            change.before.as_deref().unwrap_or("-"),
            change.after.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}

async fn courses(state: &AppState, args: CoursesArgs) -> Result<(), ConsoleError> {
    let admin = CourseAdmin::new(state.clone());
    match args.action {
        Some(CourseAction::Publish { id }) => admin.set_published(id, true).await?,
        Some(CourseAction::Unpublish { id }) => admin.set_published(id, false).await?,
        Some(CourseAction::Delete { id }) => admin.delete(id).await?,
        None => {
            admin.load().await?;
        }
    }

    let snapshot = state.store.snapshot();
    let page = screen(&args.list, None).view(&snapshot.courses);
    for course in &page.items {
        println!(
            "#{:<6} {:<40} {:>12.0} {}",
            course.id,
            course.title,
            course.price,
            if course.is_published { "đã xuất bản" } else { "nháp" }
        );
    }
    print_footer(page.page, page.page_count, page.total);
    Ok(())
}

async fn members(state: &AppState, args: MembersArgs) -> Result<(), ConsoleError> {
    let mut dialog = MemberDialog::open(state.clone(), args.course).await?;

    match args.action {
        None => {}
        Some(MemberAction::Candidates { query }) => {
            refetch::<Lecturer>(state, Collection::Canonical)
                .await
                .map_err(|e| state.report(e))?;
            for lecturer in dialog.candidates(&query) {
                println!(
                    "#{:<6} {:<32} {}",
                    lecturer.id,
                    lecturer.full_name,
                    lecturer.email.as_deref().unwrap_or("")
                );
            }
            return Ok(());
        }
        Some(MemberAction::Add { lecturer, role }) => {
            refetch::<Lecturer>(state, Collection::Canonical)
                .await
                .map_err(|e| state.report(e))?;
            let candidate = state
                .store
                .snapshot()
                .lecturers
                .canonical
                .iter()
                .find(|l| l.id == lecturer)
                .map(LecturerSummary::from)
                .ok_or_else(|| state.report(ConsoleError::NotAllowed(messages::NOT_FOUND)))?;
            dialog.add(candidate, role.into())?;
            dialog.save().await?;
        }
        Some(MemberAction::Role { lecturer, role }) => {
            dialog.change_role(lecturer, role.into())?;
            dialog.save().await?;
        }
        Some(MemberAction::Remove { lecturer }) => {
            dialog.remove(lecturer)?;
            dialog.save().await?;
        }
    }

    for row in dialog.rows() {
        println!(
            "#{:<6} {:<32} {}{}",
            row.lecturer.id,
            row.lecturer.full_name,
            row.role.label(),
            if row.removable { "" } else { " (cố định)" }
        );
    }
    Ok(())
}

async fn dashboard(state: &AppState) -> Result<(), ConsoleError> {
    for kind in EntityKind::ALL {
        for collection in [
            Collection::Canonical,
            Collection::PendingCreate,
            Collection::PendingUpdate,
        ] {
            for_kind!(kind, refetch(state, collection)).map_err(|e| state.report(e))?;
        }
    }
    CourseAdmin::new(state.clone()).load().await?;

    println!("{}", DashboardSummary::from_state(&state.store.snapshot()));
    Ok(())
}

/// Follow the realtime channel, printing events as they arrive, until
/// Ctrl-C.
pub async fn listen(
    state: &AppState,
    events: &mut broadcast::Receiver<Published>,
    cancel: CancellationToken,
) -> Result<(), ConsoleError> {
    let session = state
        .client
        .tokens()
        .access_token()
        .await
        .map_err(|e| state.report(e))?;
    if session.is_none() {
        state.bus.navigate(state.config.login_route.clone());
        return Err(ConsoleError::Api(eduhub_client::ApiError::SessionExpired));
    }

    let listener = RealtimeListener::new(state.config.realtime_url.clone())
        .with_token_source(Arc::new(StoredAccessToken(state.client.tokens().clone())));
    let listener_handle = tokio::spawn(listener.run(state.bus.clone(), cancel.clone()));
    let handler_handle =
        tokio::spawn(RealtimeHandler::new(state.clone()).run(state.bus.subscribe()));

    tracing::info!(url = %state.config.realtime_url, "Listening for notifications");
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = cancel.cancelled() => break,
            event = events.recv() => match event {
                Ok(published) => print_event(&published.event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Console output lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }

    cancel.cancel();
    let _ = listener_handle.await;
    handler_handle.abort();
    Ok(())
}

pub fn print_event(event: &ConsoleEvent) {
    match event {
        ConsoleEvent::Toast { toast } => eprintln!("{toast}"),
        ConsoleEvent::Navigate { route } => {
            eprintln!("→ {route}: đăng nhập lại bằng `eduhub-console login`")
        }
        ConsoleEvent::Realtime { envelope } => {
            eprintln!("[realtime] {} {}", envelope.kind, envelope.content_text())
        }
        ConsoleEvent::OutboxDelivered { description, .. } => {
            eprintln!("[outbox] {description}: đã gửi")
        }
        ConsoleEvent::OutboxFailed {
            description,
            attempts,
            error,
            ..
        } => eprintln!("[outbox] {description}: thất bại sau {attempts} lần ({error})"),
    }
}

/// Print whatever is buffered on `events` without waiting.
pub fn drain_events(events: &mut broadcast::Receiver<Published>) {
    loop {
        match events.try_recv() {
            Ok(published) => print_event(&published.event),
            Err(broadcast::error::TryRecvError::Lagged(n)) => {
                tracing::warn!(skipped = n, "Console output lagged");
            }
            Err(_) => break,
        }
    }
}
