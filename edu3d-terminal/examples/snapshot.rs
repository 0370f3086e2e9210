/// Example: Print one frame of every model without entering raw mode
///
/// Usage: cargo run --example snapshot -- [columns] [rows]
use edu3d_core::{ModelConfig, ModelKind};
use edu3d_terminal::TerminalApp;
use std::env;
use std::io::{self, Write};

fn main() -> edu3d_terminal::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let columns = args.get(1).and_then(|a| a.parse().ok()).unwrap_or(80);
    let rows = args.get(2).and_then(|a| a.parse().ok()).unwrap_or(30);

    let mut stdout = io::stdout();
    for kind in ModelKind::ALL {
        let mut app = TerminalApp::with_size(ModelConfig::default(), kind, columns, rows)?;
        app.render_frame();

        writeln!(stdout, "== {} ==", kind.name())?;
        app.renderer().draw(&mut stdout)?;
        writeln!(stdout)?;
    }
    stdout.flush()?;
    Ok(())
}
