//! Weather widget board - terminal front end

use std::cell::RefCell;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Frame, Terminal};
use tracing_subscriber::EnvFilter;
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};
use widget_board::action::Action;
use widget_board::api::OpenMeteo;
use widget_board::components::{BoardDisplay, BoardDisplayProps, Component};
use widget_board::config::Config;
use widget_board::effect::Effect;
use widget_board::reducer::reducer;
use widget_board::state::{AppState, ANIM_TICK_MS};
use widget_board::storage::{initial_state, WidgetStore};

/// Weather widget board - current conditions for the places you care about
#[derive(Parser, Debug)]
#[command(name = "widget-board")]
#[command(about = "A board of current-weather widgets backed by Open-Meteo")]
struct Args {
    /// Widget list location (defaults to the platform data dir)
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Language for geocoded place names
    #[arg(long, default_value = "en")]
    language: String,

    /// Do not seed an empty board with the device location
    #[arg(long)]
    no_geolocate: bool,

    /// Write logs to this file (RUST_LOG filters, default info)
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[arg(long)]
    geocoding_url: Option<String>,

    #[arg(long)]
    forecast_url: Option<String>,

    #[arg(long)]
    geolocation_url: Option<String>,

    /// Per-request timeout in seconds (minimum 1)
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: u64,

    #[command(flatten)]
    debug: DebugCliArgs,
}

impl Args {
    fn into_config(self) -> (Config, DebugCliArgs) {
        let mut config = Config::default().with_timeout(self.timeout_secs);
        if let Some(path) = self.data_file {
            config.data_file = path;
        }
        config.endpoints.language = self.language;
        if let Some(url) = self.geocoding_url {
            config.endpoints.geocoding_url = url;
        }
        if let Some(url) = self.forecast_url {
            config.endpoints.forecast_url = url;
        }
        if let Some(url) = self.geolocation_url {
            config.endpoints.geolocation_url = url;
        }
        config.geolocate = !self.no_geolocate;
        config.log_file = self.log_file;
        (config, self.debug)
    }
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum BoardComponentId {
    Board,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum BoardContext {
    Main,
}

impl EventRoutingState<BoardComponentId, BoardContext> for AppState {
    fn focused(&self) -> Option<BoardComponentId> {
        Some(BoardComponentId::Board)
    }

    fn modal(&self) -> Option<BoardComponentId> {
        None
    }

    fn binding_context(&self, _id: BoardComponentId) -> BoardContext {
        BoardContext::Main
    }

    fn default_context(&self) -> BoardContext {
        BoardContext::Main
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let (config, debug_args) = Args::parse().into_config();
    if let Some(path) = &config.log_file {
        init_logging(path)?;
    }

    let debug = DebugSession::new(debug_args);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let store_file = WidgetStore::new(config.data_file.clone());
    let geolocate = config.geolocate;
    let loader = store_file.clone();
    let state = debug
        .load_state_or_else_async(move || async move {
            initial_state(&loader, geolocate).map_err(io::Error::other)
        })
        .await
        .map_err(debug_error)?;

    let client = OpenMeteo::new(config.endpoints.clone()).map_err(io::Error::other)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let services = Services {
        client: Arc::new(client),
        store: store_file,
    };
    let result = run_app(&mut terminal, &debug, store, replay_actions, services).await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    Ok(())
}

fn init_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

/// What the effect handler talks to
#[derive(Clone)]
struct Services {
    client: Arc<OpenMeteo>,
    store: WidgetStore,
}

struct BoardUi {
    board: BoardDisplay,
}

impl BoardUi {
    fn new() -> Self {
        Self {
            board: BoardDisplay::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<BoardComponentId>,
    ) {
        event_ctx.set_component_area(BoardComponentId::Board, area);
        let props = BoardDisplayProps {
            state,
            is_focused: render_ctx.is_focused(),
        };
        self.board.render(frame, area, props);
    }

    fn handle_board_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = BoardDisplayProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self.board.handle_event(event, props).into_iter().collect();
        if actions.is_empty() {
            HandlerResponse::ignored()
        } else {
            HandlerResponse {
                actions,
                consumed: true,
                needs_render: false,
            }
        }
    }
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
    services: Services,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(BoardUi::new()));
    let mut bus: EventBus<AppState, Action, BoardComponentId, BoardContext> = EventBus::new();
    let keybindings: Keybindings<BoardContext> = Keybindings::new();

    let ui_board = Rc::clone(&ui);
    bus.register(BoardComponentId::Board, move |event, state| {
        ui_board.borrow_mut().handle_board_event(&event.kind, state)
    });

    // Re-render on terminal resize (no action needed, just redraw)
    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::BoardInit),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }

                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(ANIM_TICK_MS),
                    || Action::Tick,
                );
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, &services),
        )
        .await
}

/// Handle effects: network calls become tasks, saves run inline
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, services: &Services) {
    match effect {
        Effect::Geocode { query } => {
            let client = Arc::clone(&services.client);
            ctx.tasks().spawn(TaskKey::new("geocode"), async move {
                match client.geocode(&query).await {
                    Ok(descriptor) => Action::GeocodeDidLoad(descriptor),
                    Err(e) => Action::GeocodeDidError(e),
                }
            });
        }
        Effect::FetchWeather { card, lat, lon } => {
            let client = Arc::clone(&services.client);
            ctx.tasks()
                .spawn(TaskKey::new(format!("weather-{}", card.0)), async move {
                    match client.current_weather(lat, lon).await {
                        Ok(conditions) => Action::WeatherDidLoad(card, conditions),
                        Err(e) => Action::WeatherDidError(card, e),
                    }
                });
        }
        Effect::LocateDevice => {
            let client = Arc::clone(&services.client);
            ctx.tasks().spawn(TaskKey::new("locate"), async move {
                match client.locate_device().await {
                    Ok(point) => Action::LocateDidLoad(point),
                    Err(e) => Action::LocateDidError(e.to_string()),
                }
            });
        }
        Effect::SaveWidgets { widgets } => {
            if let Err(error) = services.store.persist(&widgets) {
                ctx.tasks()
                    .spawn(TaskKey::new("save-error"), async move {
                        Action::StorageDidError(error)
                    });
            }
        }
    }
}
