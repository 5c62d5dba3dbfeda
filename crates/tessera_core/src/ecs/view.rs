// view.rs - Multi-component queries over sparse-set pools
//
// A view never builds an index. It picks the smallest requested pool as the
// driver, walks that pool's dense entity list, and keeps the candidates that
// every other requested pool also contains.

use crate::ecs::{Component, EntityId, EntityManager, ErasedPool};
use std::iter::FusedIterator;
use std::slice;

/// A set of component types that can be queried together.
///
/// Implemented for tuples of one to eight component types.
pub trait ViewQuery {
    /// The pools backing the query, one per requested type.
    type Pools<'a>: AsRef<[&'a dyn ErasedPool]> + Copy;

    /// Fetch every requested pool, or `None` if any of them was never created.
    fn fetch(em: &EntityManager) -> Option<Self::Pools<'_>>;
}

macro_rules! impl_view_query {
    (@count) => { 0 };
    (@count $head:ident $($tail:ident)*) => { 1 + impl_view_query!(@count $($tail)*) };
    ($($T:ident),+) => {
        impl<$($T: Component),+> ViewQuery for ($($T,)+) {
            type Pools<'a> = [&'a dyn ErasedPool; impl_view_query!(@count $($T)+)];

            fn fetch(em: &EntityManager) -> Option<Self::Pools<'_>> {
                Some([$(em.erased_pool($T::component_id())?),+])
            }
        }
    };
}

impl_view_query!(A);
impl_view_query!(A, B);
impl_view_query!(A, B, C);
impl_view_query!(A, B, C, D);
impl_view_query!(A, B, C, D, E);
impl_view_query!(A, B, C, D, E, F);
impl_view_query!(A, B, C, D, E, F, G);
impl_view_query!(A, B, C, D, E, F, G, H);

/// Lazy query over the entities that hold every component type in `Q`.
///
/// A view borrows the manager, so pools cannot be structurally changed
/// while it is alive. It is cheap to build; create a fresh one per query
/// instead of keeping it around.
pub struct View<'a, Q: ViewQuery> {
    pools: Option<Q::Pools<'a>>,
    driver: &'a [EntityId],
}

impl<'a, Q: ViewQuery> View<'a, Q> {
    pub(crate) fn new(em: &'a EntityManager) -> Self {
        let Some(pools) = Q::fetch(em) else {
            return Self {
                pools: None,
                driver: &[],
            };
        };

        let driver = pools
            .as_ref()
            .iter()
            .copied()
            .min_by_key(|pool| pool.len())
            .map(|pool| pool.entities())
            .unwrap_or(&[]);

        Self {
            pools: Some(pools),
            driver,
        }
    }

    /// Iterate matching entities from the start. Can be called repeatedly.
    pub fn iter(&self) -> ViewIter<'a, Q> {
        ViewIter {
            pools: self.pools,
            candidates: self.driver.iter(),
        }
    }

    /// Number of candidates the driver pool supplies. This bounds the work
    /// done by one full iteration.
    pub fn driver_len(&self) -> usize {
        self.driver.len()
    }

    /// Whether `entity` holds every queried component.
    pub fn contains(&self, entity: EntityId) -> bool {
        self.pools
            .as_ref()
            .is_some_and(|pools| has_all(pools.as_ref(), entity))
    }
}

#[inline]
fn has_all(pools: &[&dyn ErasedPool], entity: EntityId) -> bool {
    pools.iter().all(|pool| pool.has(entity))
}

impl<'a, Q: ViewQuery> IntoIterator for View<'a, Q> {
    type Item = EntityId;
    type IntoIter = ViewIter<'a, Q>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, Q: ViewQuery> IntoIterator for &View<'a, Q> {
    type Item = EntityId;
    type IntoIter = ViewIter<'a, Q>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the entities of a [`View`].
pub struct ViewIter<'a, Q: ViewQuery> {
    pools: Option<Q::Pools<'a>>,
    candidates: slice::Iter<'a, EntityId>,
}

impl<'a, Q: ViewQuery> Iterator for ViewIter<'a, Q> {
    type Item = EntityId;

    fn next(&mut self) -> Option<EntityId> {
        let pools = self.pools.as_ref()?;
        self.candidates
            .by_ref()
            .copied()
            .find(|&entity| has_all(pools.as_ref(), entity))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.candidates.len()))
    }
}

impl<'a, Q: ViewQuery> FusedIterator for ViewIter<'a, Q> {}
