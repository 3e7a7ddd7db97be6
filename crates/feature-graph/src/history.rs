use std::collections::VecDeque;

use solid_kernel::SolidKernel;
use tracing::{debug, warn};

use crate::command::Command;
use crate::graph::FeatureGraph;
use crate::types::CommandError;

/// Mutable context a command history runs against.
pub struct EditCtx<'a> {
    pub graph: &'a mut FeatureGraph,
    pub kernel: &'a mut dyn SolidKernel,
}

/// Two-stack, bounded undo/redo history.
///
/// The undo ring never exceeds `max_depth`; executing a new command
/// discards the entire redo stack. Commands dropped at any confirmed
/// non-restoration point are disposed first, so snapshot-held kernel
/// artifacts are freed exactly once.
#[derive(Debug)]
pub struct CommandHistory {
    undo: VecDeque<Command>,
    redo: Vec<Command>,
    max_depth: usize,
}

impl CommandHistory {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Apply a command. On success it joins the undo ring (evicting the
    /// oldest entry past `max_depth`) and the redo stack is discarded. On
    /// failure the command is dropped and the history is unchanged.
    pub fn execute(&mut self, mut cmd: Command, ctx: &mut EditCtx) -> Result<(), CommandError> {
        cmd.apply(ctx.graph)?;
        debug!(command = cmd.name(), "executed");
        self.undo.push_back(cmd);
        if self.undo.len() > self.max_depth {
            if let Some(mut evicted) = self.undo.pop_front() {
                evicted.dispose(ctx.kernel);
            }
        }
        for mut stale in self.redo.drain(..) {
            stale.dispose(ctx.kernel);
        }
        Ok(())
    }

    /// Invert the most recent command. A failed inverse permanently drops
    /// the command; every other history entry stays valid.
    pub fn undo(&mut self, ctx: &mut EditCtx) -> Result<(), CommandError> {
        let mut cmd = self.undo.pop_back().ok_or(CommandError::NothingToUndo)?;
        match cmd.unapply(ctx.graph) {
            Ok(()) => {
                debug!(command = cmd.name(), "undone");
                self.redo.push(cmd);
                Ok(())
            }
            Err(e) => {
                warn!(command = cmd.name(), error = %e, "undo failed; command dropped");
                cmd.dispose(ctx.kernel);
                Err(e)
            }
        }
    }

    /// Re-apply the most recently undone command.
    pub fn redo(&mut self, ctx: &mut EditCtx) -> Result<(), CommandError> {
        let mut cmd = self.redo.pop().ok_or(CommandError::NothingToRedo)?;
        match cmd.reapply(ctx.graph) {
            Ok(()) => {
                debug!(command = cmd.name(), "redone");
                self.undo.push_back(cmd);
                if self.undo.len() > self.max_depth {
                    if let Some(mut evicted) = self.undo.pop_front() {
                        evicted.dispose(ctx.kernel);
                    }
                }
                Ok(())
            }
            Err(e) => {
                warn!(command = cmd.name(), error = %e, "redo failed; command dropped");
                cmd.dispose(ctx.kernel);
                Err(e)
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn peek_undo_name(&self) -> Option<&'static str> {
        self.undo.back().map(Command::name)
    }

    pub fn peek_redo_name(&self) -> Option<&'static str> {
        self.redo.last().map(Command::name)
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }
}
