//! Terminal rendering of live workflow progress.

use std::future::Future;

use colored::Colorize;
use pptee_core::workflow::{StepStatus, WorkflowState};
use pptee_execution::WorkflowEvent;
use tokio::sync::mpsc::UnboundedReceiver;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressLine {
    Started { label: String },
    Preview { text: String },
    Log { line: String },
    Completed { label: String },
    Failed { label: String, message: String },
}

impl ProgressLine {
    fn print(&self) {
        match self {
            ProgressLine::Started { label } => println!("{} {}", "▶".cyan(), label.bold()),
            ProgressLine::Preview { text } => println!("    {}", text.bright_magenta()),
            ProgressLine::Log { line } => println!("    {}", line.bright_black()),
            ProgressLine::Completed { label } => println!("{} {}", "✔".green(), label),
            ProgressLine::Failed { label, message } => {
                println!("{} {}: {}", "✘".red(), label, message.red())
            }
        }
    }
}

/// Turns a stream of snapshots into the lines that changed.
#[derive(Default)]
pub struct ProgressRenderer {
    last: Option<WorkflowEvent>,
}

impl ProgressRenderer {
    pub fn diff(&mut self, event: &WorkflowEvent) -> Vec<ProgressLine> {
        let previous = self
            .last
            .take()
            .filter(|last| last.workflow_id == event.workflow_id);
        let mut lines = Vec::new();

        for (index, step) in event.steps.iter().enumerate() {
            let before = previous.as_ref().and_then(|last| last.steps.get(index));
            let old_status = before.map_or(StepStatus::Pending, |s| s.status);
            let old_logs = before.map_or(0, |s| s.log_lines.len());

            if old_status == StepStatus::Pending && step.status != StepStatus::Pending {
                lines.push(ProgressLine::Started {
                    label: step.label.clone(),
                });
                if let Some(text) = &step.encrypted_preview {
                    lines.push(ProgressLine::Preview { text: text.clone() });
                }
            }
            for line in step.log_lines.iter().skip(old_logs) {
                lines.push(ProgressLine::Log { line: line.clone() });
            }
            if old_status != step.status {
                match step.status {
                    StepStatus::Completed => lines.push(ProgressLine::Completed {
                        label: step.label.clone(),
                    }),
                    StepStatus::Failed => {
                        let message = match &event.state {
                            WorkflowState::Failed { message, .. } => message.clone(),
                            _ => String::new(),
                        };
                        lines.push(ProgressLine::Failed {
                            label: step.label.clone(),
                            message,
                        });
                    }
                    _ => {}
                }
            }
        }

        self.last = Some(event.clone());
        lines
    }

    pub fn render(&mut self, event: &WorkflowEvent) {
        for line in self.diff(event) {
            line.print();
        }
    }
}

/// Awaits `future` while printing progress events as they arrive.
pub async fn drive<F, T>(future: F, events: &mut UnboundedReceiver<WorkflowEvent>) -> T
where
    F: Future<Output = T>,
{
    let mut renderer = ProgressRenderer::default();
    tokio::pin!(future);
    loop {
        tokio::select! {
            biased;
            Some(event) = events.recv() => renderer.render(&event),
            output = &mut future => {
                while let Ok(event) = events.try_recv() {
                    renderer.render(&event);
                }
                return output;
            }
        }
    }
}
