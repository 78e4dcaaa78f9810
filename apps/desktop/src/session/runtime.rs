//! Read-render loop over a line-oriented input.

use std::{io::Write, path::PathBuf};

use anyhow::Context;
use client_core::{AnalysisService, DropTarget, SubmitOutcome, UploadController};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use super::commands::{CommandParseError, SessionCommand, HELP};
use crate::{
    controller::orchestration::Workflow,
    ui::{render_workflow, shell::TITLE},
};

fn render<W: Write>(
    output: &mut W,
    workflow: &Workflow,
    drop_target: &DropTarget,
) -> anyhow::Result<()> {
    writeln!(
        output,
        "{}",
        render_workflow(workflow.state(), drop_target.is_dragging())
    )?;
    output.flush()?;
    Ok(())
}

async fn submit<S, W>(
    controller: &UploadController<S>,
    workflow: &mut Workflow,
    drop_target: &DropTarget,
    file: Option<PathBuf>,
    output: &mut W,
) -> anyhow::Result<()>
where
    S: AnalysisService,
    W: Write,
{
    let dragging = drop_target.is_dragging();
    let mut write_failure = None;
    let submitted = workflow
        .submit_path_observed(controller, file.as_deref(), |state| {
            let rendered = writeln!(output, "{}", render_workflow(state, dragging))
                .and_then(|()| output.flush());
            if let Err(err) = rendered {
                write_failure.get_or_insert(err);
            }
        })
        .await;
    if let Some(err) = write_failure {
        return Err(err).context("failed to write session output");
    }

    match submitted {
        Ok(SubmitOutcome::Ignored) => {
            writeln!(output, "No file selected.")?;
            render(output, workflow, drop_target)
        }
        Ok(_) => Ok(()),
        Err(err) => {
            writeln!(output, "Cannot start upload: {err}")?;
            render(output, workflow, drop_target)
        }
    }
}

/// Runs an interactive session until `quit` or end of input, returning the final workflow.
pub async fn run_session<S, R, W>(
    controller: &UploadController<S>,
    input: R,
    output: &mut W,
) -> anyhow::Result<Workflow>
where
    S: AnalysisService,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut workflow = Workflow::new();
    let mut drop_target = DropTarget::new();
    let mut lines = input.lines();

    writeln!(output, "{TITLE}\n")?;
    render(output, &workflow, &drop_target)?;

    while let Some(line) = lines
        .next_line()
        .await
        .context("failed to read session input")?
    {
        let command = match line.parse::<SessionCommand>() {
            Ok(command) => command,
            Err(CommandParseError::Empty) => continue,
            Err(err) => {
                writeln!(output, "{err}")?;
                continue;
            }
        };
        debug!(?command, state = workflow.state().name(), "session command");

        match command {
            SessionCommand::Upload(path) => {
                let file = drop_target.pick(Some(path));
                submit(controller, &mut workflow, &drop_target, file, output).await?;
            }
            SessionCommand::Drop(paths) => {
                let file = drop_target.drop_files(paths);
                submit(controller, &mut workflow, &drop_target, file, output).await?;
            }
            SessionCommand::DragOver => {
                drop_target.drag_over();
                render(output, &workflow, &drop_target)?;
            }
            SessionCommand::DragLeave => {
                drop_target.drag_leave();
                render(output, &workflow, &drop_target)?;
            }
            SessionCommand::Reset => {
                if let Err(err) = workflow.reset() {
                    writeln!(output, "Cannot reset: {err}")?;
                }
                render(output, &workflow, &drop_target)?;
            }
            SessionCommand::Show => render(output, &workflow, &drop_target)?,
            SessionCommand::Help => writeln!(output, "{HELP}")?,
            SessionCommand::Quit => break,
        }
    }

    Ok(workflow)
}
