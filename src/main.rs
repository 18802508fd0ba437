use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, KeyModifiers,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use indoc::indoc;
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::Rect,
    style::{Modifier, Style},
};

use gridpane::keybindings::{Action, KeyBindings};
use gridpane::ui::{UiFrame, grid_area, render_grid, slot_at};
use gridpane::{
    Binding, ClickButton, ClickEvent, Containment, ErrorPolicy, Gui, LoadOptions, Pane,
    PropertyKind, tracing_sub,
};

const DEMO_MARKUP: &str = include_str!("../demos/shop.xml");
const STATUS_LINES: usize = 4;

#[derive(Parser, Debug)]
#[command(
    name = "gridpane",
    version = env!("CARGO_PKG_VERSION"),
    about = "Preview a pane markup file as a clickable grid",
    after_help = indoc! {"
        Callbacks available to markup:
          log(event)                    record the clicked slot
          buy(event, name, price)       record a purchase and cancel the click
          turnPage(event, tag, delta)   move a paginated pane by delta pages
          close()                       quit the viewer

        Environment:
          GRIDPANE_DEGRADE=1 and GRIDPANE_STRICT_CALLBACKS=1 set the matching
          load options.
    "}
)]
struct ViewerCli {
    /// Markup file to load. The bundled demo shop is shown when omitted.
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Tag of the paginated pane the arrow keys page through.
    #[arg(long, value_name = "TAG")]
    pager: Option<String>,

    /// Append log output to this file instead of discarding it.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Skip root panes that fail to load instead of aborting.
    #[arg(long)]
    degrade: bool,

    /// Fail the load when a callback name matches nothing.
    #[arg(long)]
    strict_callbacks: bool,

    /// Route clicks with the inclusive-bounds rule, under which a paginated
    /// pane ignores clicks that land inside it. The viewer uses strict
    /// containment otherwise.
    #[arg(long)]
    legacy_containment: bool,

    /// Print the rendered grid as text and exit.
    #[arg(long)]
    dump: bool,
}

impl ViewerCli {
    fn load_options(&self) -> LoadOptions {
        let mut options = LoadOptions::from_env();
        if self.degrade {
            options = options.with_error_policy(ErrorPolicy::Degrade);
        }
        if self.strict_callbacks {
            options = options.with_strict_callbacks(true);
        }
        let containment = if self.legacy_containment {
            Containment::Legacy
        } else {
            Containment::Strict
        };
        options.with_containment(containment)
    }
}

/// Work requested by callbacks, applied once the click has been dispatched.
#[derive(Debug)]
enum Command {
    Log(String),
    TurnPage { tag: String, delta: i64 },
    Quit,
}

type Commands = Rc<RefCell<Vec<Command>>>;

fn demo_binding(commands: &Commands) -> Binding {
    let mut binding = Binding::new();
    let log = commands.clone();
    binding.on_event("log", move |event| {
        log.borrow_mut().push(Command::Log(format!(
            "slot {} ({},{}) {:?}",
            event.slot(),
            event.column(),
            event.row(),
            event.button()
        )));
        Ok(())
    });
    let buy = commands.clone();
    binding.on_event_with(
        "buy",
        &[PropertyKind::String, PropertyKind::Integer],
        move |event, args| {
            event.set_cancelled(true);
            buy.borrow_mut()
                .push(Command::Log(format!("bought {} for {}", args[0], args[1])));
            Ok(())
        },
    );
    let pager = commands.clone();
    binding.on_event_with(
        "turnPage",
        &[PropertyKind::String, PropertyKind::Integer],
        move |_, args| {
            let (Some(tag), Some(delta)) = (args[0].as_str(), args[1].as_i64()) else {
                return Ok(());
            };
            pager.borrow_mut().push(Command::TurnPage {
                tag: tag.to_string(),
                delta,
            });
            Ok(())
        },
    );
    let quit = commands.clone();
    binding.on_action("close", move || {
        quit.borrow_mut().push(Command::Quit);
        Ok(())
    });
    binding
}

struct Viewer {
    gui: Gui,
    pager: Option<String>,
    commands: Commands,
    status: VecDeque<String>,
    keys: KeyBindings,
    grid: Rect,
    quit: bool,
}

impl Viewer {
    fn click(&mut self, mouse: MouseEvent) {
        let button = match (mouse.kind, mouse.modifiers.contains(KeyModifiers::SHIFT)) {
            (MouseEventKind::Down(MouseButton::Left), false) => ClickButton::Left,
            (MouseEventKind::Down(MouseButton::Left), true) => ClickButton::ShiftLeft,
            (MouseEventKind::Down(MouseButton::Right), false) => ClickButton::Right,
            (MouseEventKind::Down(MouseButton::Right), true) => ClickButton::ShiftRight,
            (MouseEventKind::Down(MouseButton::Middle), _) => ClickButton::Middle,
            _ => return,
        };
        let Some(slot) = slot_at(self.grid, mouse.column, mouse.row) else {
            return;
        };
        let Ok(mut event) = ClickEvent::with_button(slot, button) else {
            return;
        };
        let consumed = self.gui.click(&mut event);
        tracing::debug!(slot, consumed, cancelled = event.is_cancelled(), "click dispatched");
        self.apply_commands();
    }

    fn apply_commands(&mut self) {
        let pending: Vec<Command> = self.commands.borrow_mut().drain(..).collect();
        for command in pending {
            match command {
                Command::Log(line) => self.push_status(line),
                Command::TurnPage { tag, delta } => self.turn_page(&tag, delta),
                Command::Quit => self.quit = true,
            }
        }
    }

    fn turn_page(&mut self, tag: &str, delta: i64) {
        let Some(pane) = self
            .gui
            .find_pane_mut(tag)
            .and_then(|pane| pane.as_paginated_mut())
        else {
            self.push_status(format!("no paginated pane tagged `{tag}`"));
            return;
        };
        let count = pane.page_count() as i64;
        if count == 0 {
            return;
        }
        let page = (pane.page() as i64 + delta).rem_euclid(count) as usize;
        if let Err(err) = pane.set_page(page) {
            tracing::warn!(tag, error = %err, "page change rejected");
            return;
        }
        self.push_status(format!("{tag}: page {}/{count}", page + 1));
    }

    fn push_status(&mut self, line: String) {
        tracing::info!("{line}");
        if self.status.len() == STATUS_LINES {
            self.status.pop_front();
        }
        self.status.push_back(line);
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let body = Rect {
            y: area.y.saturating_add(1),
            height: area.height.saturating_sub(1),
            ..area
        };
        self.grid = grid_area(body, self.gui.rows());
        let grid = self.gui.render();

        let mut ui = UiFrame::new(frame);
        ui.set_string(
            area.x,
            area.y,
            self.gui.title(),
            Style::default().add_modifier(Modifier::BOLD),
        );
        render_grid(&mut ui, self.grid, &grid, self.gui.rows());

        let mut y = self.grid.y.saturating_add(self.grid.height).saturating_add(1);
        let help = format!(
            "quit: {} | pages: {} / {}",
            self.keys.combos_for(Action::Quit).join(", "),
            self.keys.combos_for(Action::PrevPage).join(", "),
            self.keys.combos_for(Action::NextPage).join(", "),
        );
        ui.set_string(area.x, y, &help, Style::default().add_modifier(Modifier::DIM));
        for line in &self.status {
            y = y.saturating_add(1);
            ui.set_string(area.x, y, line, Style::default());
        }
    }
}

fn main() -> io::Result<()> {
    let args = ViewerCli::parse();
    if let Some(path) = &args.log_file {
        tracing_sub::set_log_file(path)?;
        tracing_sub::init_default();
    } else if args.dump {
        tracing_sub::init_default();
    }

    let commands: Commands = Rc::default();
    let binding = demo_binding(&commands);
    let options = args.load_options();
    let gui = match &args.file {
        Some(path) => Gui::load_file(path, &binding, options),
        None => Gui::load(DEMO_MARKUP, &binding, options),
    }
    .map_err(io::Error::other)?;

    if args.dump {
        println!("{}", gui.title());
        print!("{}", gui.render());
        return Ok(());
    }

    let pager = args.pager.clone().or_else(|| {
        gui.panes()
            .iter()
            .find(|pane| pane.as_paginated().is_some())
            .and_then(|pane| pane.tag().map(String::from))
    });
    let mut viewer = Viewer {
        gui,
        pager,
        commands,
        status: VecDeque::with_capacity(STATUS_LINES),
        keys: KeyBindings::default(),
        grid: Rect::default(),
        quit: false,
    };

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        cursor::Hide
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_viewer(&mut terminal, &mut viewer);

    terminal.show_cursor()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        cursor::Show
    )?;
    terminal::disable_raw_mode()?;

    result
}

type ViewerTerminal = Terminal<CrosstermBackend<Stdout>>;

fn run_viewer(terminal: &mut ViewerTerminal, viewer: &mut Viewer) -> io::Result<()> {
    while !viewer.quit {
        terminal.draw(|frame| viewer.draw(frame))?;
        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                match viewer.keys.action_for_key(&key) {
                    Some(Action::Quit) => viewer.quit = true,
                    Some(Action::NextPage) => page_with_keys(viewer, 1),
                    Some(Action::PrevPage) => page_with_keys(viewer, -1),
                    None => {}
                }
            }
            Event::Mouse(mouse) => viewer.click(mouse),
            _ => {}
        }
    }
    Ok(())
}

fn page_with_keys(viewer: &mut Viewer, delta: i64) {
    match viewer.pager.clone() {
        Some(tag) => viewer.turn_page(&tag, delta),
        None => viewer.push_status("no pager pane; pass --pager TAG".to_string()),
    }
}
