use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use indoc::indoc;
use tracing::Level;

use gridpane::{Binding, ErrorPolicy, Gui, LoadOptions, Pane, PaneNode, tracing_sub};

#[derive(Parser, Debug)]
#[command(
    name = "gridpane-check",
    version = env!("CARGO_PKG_VERSION"),
    about = "Load pane markup files and print what they render",
    after_help = indoc! {"
        Every file is loaded against a binding that only knows the names passed
        with --stub. Unresolved callbacks are reported as warnings, or as errors
        with --strict-callbacks. Each page of every root paginated pane is
        printed as a 9-column text grid ('.' marks an empty slot).
    "}
)]
struct CheckCli {
    /// Markup files to check.
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// Register a no-op click handler and populate hook under NAME.
    #[arg(long = "stub", value_name = "NAME")]
    stubs: Vec<String>,

    /// Fail when a callback name matches nothing.
    #[arg(long)]
    strict_callbacks: bool,

    /// Skip root panes that fail to load instead of failing the file.
    #[arg(long)]
    degrade: bool,

    /// Only report failures.
    #[arg(short, long)]
    quiet: bool,
}

impl CheckCli {
    fn binding(&self) -> Binding {
        let mut binding = Binding::new();
        for name in &self.stubs {
            binding
                .on_event(name, |_| Ok(()))
                .on_populate(name, |_| Ok(()));
        }
        binding
    }

    fn options(&self) -> LoadOptions {
        let policy = if self.degrade {
            ErrorPolicy::Degrade
        } else {
            ErrorPolicy::Propagate
        };
        LoadOptions::from_env()
            .with_error_policy(policy)
            .with_strict_callbacks(self.strict_callbacks)
    }
}

fn main() -> ExitCode {
    let args = CheckCli::parse();
    tracing_sub::init(if args.quiet { Level::ERROR } else { Level::WARN });

    let binding = args.binding();
    let options = args.options();
    let mut failures = 0;
    for path in &args.files {
        match Gui::load_file(path, &binding, options) {
            Ok(gui) => {
                if !args.quiet {
                    print_report(path, &gui);
                }
            }
            Err(err) => {
                failures += 1;
                eprintln!("{}: {err}", path.display());
            }
        }
    }

    if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_report(path: &Path, gui: &Gui) {
    println!(
        "{}: \"{}\", {} row(s), {} root pane(s)",
        path.display(),
        gui.title(),
        gui.rows(),
        gui.panes().len()
    );
    for (index, pane) in gui.panes().iter().enumerate() {
        println!("  [{index}] {}", describe(pane));
    }
    print!("{}", gui.render());

    for (index, pane) in gui.panes().iter().enumerate() {
        let Some(paginated) = pane.as_paginated() else {
            continue;
        };
        for page in 0..paginated.page_count() {
            let mut preview = gui.clone();
            let Some(target) = preview
                .panes_mut()
                .get_mut(index)
                .and_then(PaneNode::as_paginated_mut)
            else {
                continue;
            };
            if target.set_page(page).is_err() {
                continue;
            }
            println!("  [{index}] page {}/{}", page + 1, paginated.page_count());
            print!("{}", preview.render());
        }
    }
}

fn describe(pane: &PaneNode) -> String {
    let base = pane.base();
    let mut text = format!(
        "<{}> at {} size {}x{}",
        pane.kind(),
        base.origin(),
        base.length(),
        base.height()
    );
    if let Some(tag) = pane.tag() {
        text.push_str(&format!(" tag={tag}"));
    }
    if !pane.visible() {
        text.push_str(" hidden");
    }
    if let Some(paginated) = pane.as_paginated() {
        text.push_str(&format!(" pages={}", paginated.page_count()));
    }
    text
}
