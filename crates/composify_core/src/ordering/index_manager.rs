//! Index manager and its collaborator contracts.

use log::{debug, info, warn};
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// An item positioned among its siblings by an explicit `index`.
pub trait OrderedChild {
    /// Stable identity; also breaks ties between equal indices.
    type Id: Copy + Ord + Display;

    fn child_id(&self) -> Self::Id;
    fn index(&self) -> i64;
    fn set_index(&mut self, index: i64);
}

/// Read side: loads the current children of one parent.
pub trait ChildAccessor {
    type ParentId: Copy + Display;
    type Child: OrderedChild;
    type Error: Error + 'static;

    /// Returns every child of `parent`, in any order.
    fn children(&self, parent: Self::ParentId) -> Result<Vec<Self::Child>, Self::Error>;

    /// Finds the child whose `index` field equals `index`.
    ///
    /// The default is a linear scan over [`ChildAccessor::children`]; stores
    /// with an indexed lookup may override it.
    fn child_at(
        &self,
        parent: Self::ParentId,
        index: i64,
    ) -> Result<Option<Self::Child>, Self::Error> {
        Ok(self
            .children(parent)?
            .into_iter()
            .find(|child| child.index() == index))
    }
}

/// Write side: durable save/mutate/delete primitives for children.
pub trait PersistenceGateway<C> {
    type Error: Error + 'static;

    /// Applies `change` to `child` inside one write scope and persists it.
    ///
    /// The scope is committed on success and released on every error path.
    fn update<F>(&self, child: &mut C, change: F) -> Result<(), Self::Error>
    where
        F: FnOnce(&mut C);

    /// Persists a newly created child.
    fn save(&self, child: &C) -> Result<(), Self::Error>;

    /// Removes a child from storage.
    fn delete(&self, child: &C) -> Result<(), Self::Error>;
}

/// Errors from index manager operations.
#[derive(Debug)]
pub enum IndexError<P, E> {
    /// No child of `parent` carries `index`.
    InvalidIndex { parent: P, index: i64 },
    /// A child of `parent` already holds `i64::MAX`; nothing can follow it.
    IndexOverflow { parent: P },
    /// Accessor or gateway failure, passed through unchanged.
    Persistence(E),
}

impl<P: Display, E: Display> Display for IndexError<P, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidIndex { parent, index } => {
                write!(f, "no child at index {index} under parent {parent}")
            }
            Self::IndexOverflow { parent } => {
                write!(f, "parent {parent} has no index left after i64::MAX")
            }
            Self::Persistence(err) => write!(f, "persistence failure: {err}"),
        }
    }
}

impl<P, E> Error for IndexError<P, E>
where
    P: Debug + Display,
    E: Error + 'static,
{
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidIndex { .. } | Self::IndexOverflow { .. } => None,
            Self::Persistence(err) => Some(err),
        }
    }
}

/// Result type for operations driven by accessor `A`.
pub type IndexResult<T, A> =
    Result<T, IndexError<<A as ChildAccessor>::ParentId, <A as ChildAccessor>::Error>>;

/// Returns the index a newly appended child should take.
///
/// Uses `max(index) + 1` rather than the child count so an existing gap is
/// never turned into a duplicate. `None` when the highest index is `i64::MAX`.
pub fn next_index_of<C: OrderedChild>(children: &[C]) -> Option<i64> {
    match children.iter().map(OrderedChild::index).max() {
        Some(max) => max.checked_add(1),
        None => Some(0),
    }
}

/// Maintains dense child indices for parents behind an injected store.
///
/// Callers serialize structural changes per parent; the manager holds no lock.
pub struct ChildIndexManager<'a, A, G> {
    accessor: &'a A,
    gateway: &'a G,
}

impl<'a, A, G> ChildIndexManager<'a, A, G>
where
    A: ChildAccessor,
    G: PersistenceGateway<A::Child, Error = A::Error>,
{
    pub fn new(accessor: &'a A, gateway: &'a G) -> Self {
        Self { accessor, gateway }
    }

    /// Returns `0` for a childless parent, otherwise the highest index plus one.
    ///
    /// Read-only.
    pub fn next_index(&self, parent: A::ParentId) -> IndexResult<i64, A> {
        let children = self.load(parent)?;
        next_index_of(&children).ok_or(IndexError::IndexOverflow { parent })
    }

    /// Looks up the child whose `index` field equals `index`.
    pub fn child_at_index(
        &self,
        parent: A::ParentId,
        index: i64,
    ) -> IndexResult<Option<A::Child>, A> {
        self.accessor
            .child_at(parent, index)
            .map_err(IndexError::Persistence)
    }

    /// Appends `child` under `parent` and saves it.
    pub fn insert_child(&self, parent: A::ParentId, child: &mut A::Child) -> IndexResult<(), A> {
        let index = self.next_index(parent)?;
        child.set_index(index);
        self.gateway.save(child).map_err(IndexError::Persistence)?;
        debug!(
            "event=child_insert module=ordering status=ok parent={parent} child={} index={index}",
            child.child_id()
        );
        Ok(())
    }

    /// Deletes the child at `child_index` and closes the gap it leaves.
    ///
    /// Every sibling above `child_index` is decremented by one (one gateway
    /// write each), then the child itself is deleted. Returns the removed child.
    ///
    /// # Errors
    /// - `InvalidIndex` when no child carries `child_index`; nothing is written.
    /// - `Persistence` on the first failed write. Earlier decrements stay applied.
    pub fn delete_child_and_normalize(
        &self,
        parent: A::ParentId,
        child_index: i64,
    ) -> IndexResult<A::Child, A> {
        let mut children = self.load(parent)?;
        let Some(position) = children
            .iter()
            .position(|child| child.index() == child_index)
        else {
            debug!(
                "event=child_delete module=ordering status=rejected parent={parent} index={child_index} error_code=invalid_index"
            );
            return Err(IndexError::InvalidIndex {
                parent,
                index: child_index,
            });
        };
        let target = children.swap_remove(position);

        let mut renumbered = 0usize;
        for sibling in children
            .iter_mut()
            .filter(|sibling| sibling.index() > child_index)
        {
            if let Err(err) = self
                .gateway
                .update(sibling, |child| child.set_index(child.index() - 1))
            {
                warn!(
                    "event=child_delete module=ordering status=error parent={parent} index={child_index} renumbered={renumbered} error_code=renumber_failed repair_required=true error={err}"
                );
                return Err(IndexError::Persistence(err));
            }
            renumbered += 1;
        }

        if let Err(err) = self.gateway.delete(&target) {
            warn!(
                "event=child_delete module=ordering status=error parent={parent} index={child_index} renumbered={renumbered} error_code=delete_failed repair_required={} error={err}",
                renumbered > 0
            );
            return Err(IndexError::Persistence(err));
        }

        info!(
            "event=child_delete module=ordering status=ok parent={parent} child={} index={child_index} renumbered={renumbered}",
            target.child_id()
        );
        Ok(target)
    }

    /// Moves the child at `from` to position `to`, shifting the others.
    ///
    /// `to` is clamped to the valid range. Returns the number of writes issued;
    /// children whose index does not change are not written.
    pub fn move_child(&self, parent: A::ParentId, from: i64, to: i64) -> IndexResult<usize, A> {
        let mut ordered = self.load_ordered(parent)?;
        let Some(position) = ordered.iter().position(|child| child.index() == from) else {
            return Err(IndexError::InvalidIndex {
                parent,
                index: from,
            });
        };

        let moving = ordered.remove(position);
        let target = to.clamp(0, ordered.len() as i64) as usize;
        ordered.insert(target, moving);

        let writes = self.write_dense(ordered)?;
        debug!(
            "event=child_move module=ordering status=ok parent={parent} from={from} to={target} writes={writes}"
        );
        Ok(writes)
    }

    /// Rewrites indices of `parent`'s children to `0..n`, keeping their
    /// current relative order.
    ///
    /// Children sharing an index (left behind by a failed delete) are ordered
    /// by id, which need not match their order before the failure.
    ///
    /// Returns the number of children rewritten; `0` means already dense.
    pub fn repair(&self, parent: A::ParentId) -> IndexResult<usize, A> {
        let ordered = self.load_ordered(parent)?;
        let writes = self.write_dense(ordered)?;
        if writes > 0 {
            info!("event=child_repair module=ordering status=ok parent={parent} writes={writes}");
        }
        Ok(writes)
    }

    fn load(&self, parent: A::ParentId) -> IndexResult<Vec<A::Child>, A> {
        self.accessor
            .children(parent)
            .map_err(IndexError::Persistence)
    }

    fn load_ordered(&self, parent: A::ParentId) -> IndexResult<Vec<A::Child>, A> {
        let mut children = self.load(parent)?;
        children.sort_by(compare_children);
        Ok(children)
    }

    fn write_dense(&self, ordered: Vec<A::Child>) -> IndexResult<usize, A> {
        let mut writes = 0usize;
        for (position, mut child) in ordered.into_iter().enumerate() {
            let index = position as i64;
            if child.index() == index {
                continue;
            }
            self.gateway
                .update(&mut child, |child| child.set_index(index))
                .map_err(IndexError::Persistence)?;
            writes += 1;
        }
        Ok(writes)
    }
}

fn compare_children<C: OrderedChild>(left: &C, right: &C) -> Ordering {
    left.index()
        .cmp(&right.index())
        .then_with(|| left.child_id().cmp(&right.child_id()))
}
