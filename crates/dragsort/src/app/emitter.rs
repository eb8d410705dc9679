//! Delivery of finalized reorder instructions to the caller.

use crate::app::session::DragSession;
use crate::domain::model::ReorderInstruction;

/// Receives the reorder instruction of every completed, actionable gesture.
pub trait ReorderSink<T> {
    fn on_reorder(&mut self, instruction: ReorderInstruction<T>);
}

impl<T, F> ReorderSink<T> for F
where
    F: FnMut(ReorderInstruction<T>),
{
    fn on_reorder(&mut self, instruction: ReorderInstruction<T>) {
        self(instruction)
    }
}

/// Recording sink, handy for replays and tests.
impl<T> ReorderSink<T> for Vec<ReorderInstruction<T>> {
    fn on_reorder(&mut self, instruction: ReorderInstruction<T>) {
        self.push(instruction);
    }
}

/// Builds instructions from finished sessions and hands them to the sink.
#[derive(Debug)]
pub struct ReorderEmitter<S> {
    sink: S,
    emitted: u64,
}

impl<S> ReorderEmitter<S> {
    pub fn new(sink: S) -> Self {
        Self { sink, emitted: 0 }
    }

    /// Number of instructions delivered so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Consume `session` and deliver its instruction synchronously.
    pub fn emit<T>(&mut self, session: DragSession<T>)
    where
        S: ReorderSink<T>,
    {
        let instruction = session.into_instruction();
        tracing::info!(
            source_list = %instruction.source_list,
            source_index = instruction.source_index,
            target_list = %instruction.target_list,
            target_index = instruction.target_index,
            "emitting reorder"
        );
        self.emitted += 1;
        self.sink.on_reorder(instruction);
    }
}
