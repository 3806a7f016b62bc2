use crate::cli::InfoArgs;
use anyhow::{Context, Result};
use gapedit::{BufferHandle, BufferPool, Config};
use gapedit_indent::{CTokenizer, IndentPass};
use gapedit_text::TextBufferKind;
use std::io::Write;

pub fn handle(args: &InfoArgs, config: &Config, out: &mut dyn Write) -> Result<()> {
    let mut pool = BufferPool::new(config.buffer_options());
    let handle = pool
        .open_file(&args.path)
        .with_context(|| format!("Failed to open {}", args.path.display()))?;

    let buffer = pool.buffer(handle)?;
    let kind = buffer.kind();
    writeln!(out, "path:  {}", args.path.display())?;
    writeln!(out, "kind:  {kind:?}")?;
    writeln!(out, "size:  {} bytes", buffer.len())?;
    writeln!(out, "lines: {}", buffer.line_count())?;

    if kind == TextBufferKind::CFile {
        pool.refresh_tokens(handle, &CTokenizer)?;
        let depth = max_depth(&pool, handle)?;
        writeln!(out, "depth: {depth}")?;
    }
    Ok(())
}

/// Deepest indentation of any line.
fn max_depth(pool: &BufferPool, handle: BufferHandle) -> Result<usize> {
    let (buffer, tokens) = pool.buffer_and_tokens(handle)?;
    let mut pass = IndentPass::new(tokens);
    Ok(buffer
        .lines()
        .map(|line| pass.line_depth(line.range()))
        .max()
        .unwrap_or(0))
}
