use crate::cli::RunArgs;
use anyhow::{Context, Result};
use gapedit::{BufferPool, Config, TextView};
use gapedit_text::{parse_script, MemoryClipboard};
use std::io::Write;
use tracing::info;

pub fn handle(args: &RunArgs, config: &Config, out: &mut dyn Write) -> Result<()> {
    let script = std::fs::read_to_string(&args.script)
        .with_context(|| format!("Failed to read script {}", args.script.display()))?;
    let commands = parse_script(&script)
        .with_context(|| format!("Failed to parse script {}", args.script.display()))?;

    let mut pool = BufferPool::new(config.buffer_options());
    let handle = pool
        .open_file(&args.path)
        .with_context(|| format!("Failed to open {}", args.path.display()))?;
    let mut view = TextView::new();
    view.attach(&mut pool, handle)?;

    let mut clipboard = MemoryClipboard::default();
    let mut changed = 0;
    for command in &commands {
        if view.execute(&mut pool, command, &mut clipboard, config.tab_width)? {
            changed += 1;
        }
    }
    info!(commands = commands.len(), changed, "script finished");

    let buffer = pool.buffer(handle)?;
    if args.print {
        let (left, right) = buffer.get_strings();
        out.write_all(left)?;
        out.write_all(right)?;
        out.flush()?;
    }
    if args.write {
        buffer
            .save_to_disk()
            .with_context(|| format!("Failed to save {}", args.path.display()))?;
    }

    view.detach(&mut pool)?;
    Ok(())
}
