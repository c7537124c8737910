#![forbid(unsafe_code)]

//! ctxtree demo binary.
//!
//! Renders the walkthrough tree, clicks the switch `--clicks` times, and
//! prints every frame as text or as a JSON snapshot.

mod cli;
mod tree;

use std::process::ExitCode;

use ctxtree::prelude::*;

fn print_frame(frame: u32, node: &Node, json: bool) -> Result<(), serde_json::Error> {
    if json {
        let snapshot = serde_json::json!({
            "frame": frame,
            "text": node.text_content(),
            "tree": node,
        });
        println!("{}", serde_json::to_string(&snapshot)?);
    } else {
        println!("[{frame}] {}", node.text_content());
    }
    Ok(())
}

fn run(opts: &cli::Opts) -> Result<(), Box<dyn std::error::Error>> {
    let toggle = tree::usage(ToggleConfig::default());
    let root = Root::new(toggle.view());
    let invalidate = root.invalidator();
    let _sub = toggle.store().subscribe(move |_| invalidate.call());

    let mut frame = 0;
    let mut node = root.render()?;
    print_frame(frame, &node, opts.json)?;

    for _ in 0..opts.clicks {
        if !node.click("switch") {
            return Err("no switch in the rendered tree".into());
        }
        if let Some(next) = root.render_if_dirty()? {
            frame += 1;
            node = next;
            print_frame(frame, &node, opts.json)?;
        }
    }
    tracing::debug!(frames = root.frames(), on = toggle.is_on(), "demo.done");
    Ok(())
}

fn main() -> ExitCode {
    let opts = cli::Opts::parse();

    if opts.log_json
        && let Err(err) = ctxtree::logging::init_json()
    {
        eprintln!("failed to install log subscriber: {err}");
        return ExitCode::FAILURE;
    }

    match run(&opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
