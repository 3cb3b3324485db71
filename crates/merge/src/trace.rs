use taxonomy_graph::NodeId;

/// Why an edge or node left the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Edge endpoints resolved to different branches.
    CrossBranch,
    /// Same branch, but the strict class-consistency check failed.
    ClassMismatch,
    /// Back edge removed while breaking a strongly connected component.
    CycleBack,
    /// Edge implied by a longer path.
    Redundant,
    /// Unconnected node whose candidate parents tied between branches.
    NoMajorityBranch,
    /// Node never attached to any branch.
    Unattached,
    /// Node not reachable from the branch roots after reduction.
    Orphaned,
}

/// Debug-trace events emitted while the pipeline mutates the graph.
///
/// Node ids are resolvable through the indexer carried in the
/// [`MergeOutcome`](crate::MergeOutcome). Tracing has no effect on the
/// merge result; the sink is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    EdgeDropped {
        from: NodeId,
        to: NodeId,
        reason: DropReason,
    },
    NodeContracted {
        node: NodeId,
    },
    NodeDropped {
        node: NodeId,
        reason: DropReason,
    },
}

pub trait TraceSink {
    fn record(&mut self, event: TraceEvent);
}

/// Sink that keeps every event; handy in tests and diagnostics.
#[derive(Debug, Default)]
pub struct VecSink(pub Vec<TraceEvent>);

impl TraceSink for VecSink {
    fn record(&mut self, event: TraceEvent) {
        self.0.push(event);
    }
}

/// Internal pass-through that makes the optional sink ergonomic for the
/// pipeline stages.
pub(crate) struct Tracer<'a> {
    sink: Option<&'a mut dyn TraceSink>,
}

impl<'a> Tracer<'a> {
    pub(crate) fn new(sink: Option<&'a mut dyn TraceSink>) -> Self {
        Self { sink }
    }

    pub(crate) fn record(&mut self, event: TraceEvent) {
        if let Some(sink) = self.sink.as_mut() {
            sink.record(event);
        }
    }
}
