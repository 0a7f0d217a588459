/// This trait is implemented for everything that can act as an edge of a
/// [`Graph`](crate::Graph), so that edges can be used in generic contexts.
pub trait IsEdge<N, L> {
    /// Returns the node from which the edge originates.
    fn source(&self) -> N;
    /// Returns the node that the edge points to.
    fn target(&self) -> N;
    /// Returns the label of the edge.
    fn label(&self) -> L;

    /// Destructures the edge into its components.
    fn into_tuple(self) -> (N, L, N)
    where
        Self: Sized,
    {
        (self.source(), self.label(), self.target())
    }
}

/// Represents a reference to an edge in a graph. The label is borrowed from the graph.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct EdgeReference<'g, N, L> {
    source: N,
    label: &'g L,
    target: N,
}

impl<'g, N, L> EdgeReference<'g, N, L> {
    /// Creates a new edge reference from the given components.
    pub fn new(source: N, label: &'g L, target: N) -> Self {
        Self {
            source,
            label,
            target,
        }
    }

    /// Gives access to the borrowed label without cloning it.
    pub fn label_ref(&self) -> &'g L {
        self.label
    }
}

impl<'g, N: Copy, L: Clone> IsEdge<N, L> for EdgeReference<'g, N, L> {
    fn source(&self) -> N {
        self.source
    }

    fn target(&self) -> N {
        self.target
    }

    fn label(&self) -> L {
        self.label.clone()
    }
}

impl<'g, N: PartialEq, L: PartialEq> PartialEq<(N, L, N)> for EdgeReference<'g, N, L> {
    fn eq(&self, other: &(N, L, N)) -> bool {
        self.source == other.0 && self.label == &other.1 && self.target == other.2
    }
}
