//! Host-side command queue: widget callbacks push commands, the host loop
//! drains them and advances its own step bookkeeping.

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use agent_core::{AgentError, FlowCallbacks, FlowCommand, FlowStep};

#[derive(Clone, Default)]
pub struct CommandQueue {
    inner: Rc<RefCell<VecDeque<FlowCommand>>>,
}

impl CommandQueue {
    pub fn callbacks(&self) -> FlowCallbacks {
        FlowCallbacks::new(
            self.sender(FlowCommand::Back),
            self.sender(FlowCommand::Close),
            self.sender(FlowCommand::Confirm),
        )
    }

    fn sender(&self, command: FlowCommand) -> impl FnMut() + 'static {
        let inner = Rc::clone(&self.inner);
        move || {
            inner.borrow_mut().push_back(command);
            tracing::debug!(command = command.name(), "queued widget->host command");
        }
    }

    /// Applies every queued command to `step`, returning the final step and
    /// the commands that were applied.
    pub fn drain_into(&self, mut step: FlowStep) -> Result<(FlowStep, Vec<FlowCommand>), AgentError> {
        let drained: Vec<FlowCommand> = self.inner.borrow_mut().drain(..).collect();
        for command in &drained {
            step = step.apply(*command)?;
        }
        Ok((step, drained))
    }
}
