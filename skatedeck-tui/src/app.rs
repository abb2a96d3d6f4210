//! Application runtime: terminal lifecycle and the event loop.
//!
//! A single cooperative task owns everything. Store fetches are awaited
//! inline and the debouncer collapses keystroke bursts before they become
//! navigations, so a superseded fetch can never deliver late.

use std::io;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use crossterm::cursor::Hide;
use crossterm::cursor::MoveTo;
use crossterm::cursor::MoveToNextLine;
use crossterm::cursor::Show;
use crossterm::event::Event;
use crossterm::event::EventStream;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use crossterm::style::Print;
use crossterm::terminal;
use crossterm::terminal::Clear;
use crossterm::terminal::ClearType;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::{execute, queue};
use futures::StreamExt;

use skatedeck_lib::SkaterStore;
use skatedeck_lib::SqliteStore;
use skatedeck_lib::error::StoreError;
use skatedeck_lib::store::sample;

use crate::debounce::Debouncer;
use crate::paths;
use crate::views::ClientView;
use crate::views::ServerView;
use crate::views::ViewAction;

/// Records created on first run against an empty database.
const SEED_COUNT: usize = 100;

/// Delay between the last filter keystroke and the resulting fetch.
const FILTER_DEBOUNCE: Duration = Duration::from_millis(500);

const FOOTER: &str = "tab view · ↑↓ rows · ←→ cols · s sort · space select · a select page · [ ] page · { } ends · i size · / email · ? search · m/g/x stance · c columns · d delete · q quit";

/// Fatal application errors. Store errors inside a view render as status
/// messages instead of bubbling up here.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Terminal I/O failed.
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),

    /// The store could not be opened or seeded.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// No platform data directory could be determined.
    #[error("could not determine a platform data directory")]
    NoDataDir,
}

/// Which view is on screen.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Active {
    Server,
    Client,
}

/// Puts the terminal into raw/alternate-screen mode and restores it on drop.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Opens the store, seeds it on first run, and drives the UI until quit.
pub async fn run() -> Result<(), AppError> {
    let db_path = paths::roster_db().ok_or(AppError::NoDataDir)?;
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let store = SqliteStore::open(&db_path).await?;

    if store.count().await? == 0 {
        log::info!("empty roster, seeding {} sample records", SEED_COUNT);
        for skater in sample(SEED_COUNT) {
            store.insert(&skater).await?;
        }
    }
    let store = Arc::new(store);

    let mut server = ServerView::new(store.clone());
    server.complete_fetch().await;
    let mut client: Option<ClientView> = None;
    let mut active = Active::Server;
    let mut app_status: Option<String> = None;

    let _guard = TerminalGuard::new()?;
    let mut events = EventStream::new();
    let mut debouncer = Debouncer::new(FILTER_DEBOUNCE);

    loop {
        draw(&view_lines(active, &server, &client), app_status.as_deref())?;

        tokio::select! {
            maybe_event = events.next() => {
                let Some(event) = maybe_event else { break };
                match event? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if is_quit(&key, is_typing(active, &server, &client)) {
                            break;
                        }

                        if key.code == KeyCode::Tab {
                            match active {
                                Active::Server => {
                                    if client.is_none() {
                                        // The client view fetches the whole
                                        // roster exactly once, here.
                                        match ClientView::open(store.clone()).await {
                                            Ok(view) => client = Some(view),
                                            Err(e) => {
                                                log::warn!("client view failed to open: {e}");
                                                app_status =
                                                    Some(format!("Client view unavailable: {e}"));
                                            }
                                        }
                                    }
                                    if client.is_some() {
                                        active = Active::Client;
                                    }
                                }
                                Active::Client => active = Active::Server,
                            }
                        } else {
                            let action = match active {
                                Active::Server => server.handle_key(key).await,
                                Active::Client => match client.as_mut() {
                                    Some(view) => view.handle_key(key).await,
                                    None => ViewAction::None,
                                },
                            };

                            match action {
                                ViewAction::FilterEdited => debouncer.poke(),
                                ViewAction::CommitFilter => {
                                    debouncer.disarm();
                                    commit_filter(active, &mut server, &mut client);
                                }
                                ViewAction::None => {}
                            }
                        }
                    }
                    _ => {}
                }
            }
            _ = debouncer.wait(), if debouncer.is_armed() => {
                debouncer.disarm();
                commit_filter(active, &mut server, &mut client);
            }
        }

        // Second phase of a staged navigation: show the in-flight frame,
        // then run the fetch it describes.
        if active == Active::Server && server.needs_fetch() {
            draw(&view_lines(active, &server, &client), app_status.as_deref())?;
            server.complete_fetch().await;
        }
    }

    Ok(())
}

fn is_typing(active: Active, server: &ServerView, client: &Option<ClientView>) -> bool {
    match active {
        Active::Server => server.is_typing(),
        Active::Client => client.as_ref().is_some_and(ClientView::is_typing),
    }
}

fn is_quit(key: &KeyEvent, typing: bool) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('q') {
        return true;
    }
    !typing && key.code == KeyCode::Char('q')
}

fn commit_filter(active: Active, server: &mut ServerView, client: &mut Option<ClientView>) {
    match active {
        Active::Server => server.commit_filter(),
        Active::Client => {
            if let Some(view) = client.as_mut() {
                view.commit_filter();
            }
        }
    }
}

fn view_lines(active: Active, server: &ServerView, client: &Option<ClientView>) -> Vec<String> {
    let (width, _) = terminal::size().unwrap_or((100, 30));
    let mut lines = match active {
        Active::Server => server.render(width),
        Active::Client => client
            .as_ref()
            .map(|view| view.render(width))
            .unwrap_or_default(),
    };
    lines.push(FOOTER.to_string());
    lines
}

fn draw(lines: &[String], status: Option<&str>) -> io::Result<()> {
    let (_, height) = terminal::size()?;
    let mut stdout = io::stdout();

    queue!(stdout, MoveTo(0, 0), Clear(ClearType::All))?;
    for line in lines.iter().take(height.saturating_sub(1) as usize) {
        queue!(stdout, Print(line), MoveToNextLine(1))?;
    }
    if let Some(status) = status {
        queue!(stdout, Print(status), MoveToNextLine(1))?;
    }
    stdout.flush()
}
