// Copyright 2025 the Gridwire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core scene implementation: structure, dirty tracking, layout, queries.

use alloc::vec::Vec;
use core::cmp::Reverse;

use gridwire_hit::{Aabb, BoxCollider, Collider, HitScore, PolylineCollider, PreciseHitTest};
use gridwire_index::GridIndex;
use gridwire_router::Router;
use kurbo::{Point, Size, Vec2};

use crate::SceneError;
use crate::node::{NodeData, NodeGeometry, NodeTemplate, snap_node_position};
use crate::types::{EntityFlags, EntityId, QueryFilter, SceneConfig};
use crate::wire::WireData;

/// Default layer of nodes, above wires.
pub const NODE_LAYER: i32 = 1;
/// Default layer of wires and generic entities.
pub const WIRE_LAYER: i32 = 0;

/// What an entity is.
#[derive(Clone, Debug)]
pub enum EntityKind {
    /// A plain entity. With an extent it is a box centered on its position;
    /// without one its bounding box is the union of its children.
    Generic {
        /// Size of the box, if the entity has its own geometry.
        extent: Option<Size>,
    },
    /// A node occupying grid cells, with connectors.
    Node(NodeData),
    /// A routed wire between two node connectors.
    Wire(WireData),
}

/// A scene entity.
///
/// Entities are owned by the [`Scene`] and addressed by [`EntityId`]. The
/// parent owns the ordered child list; insertion order is draw and hit order.
#[derive(Clone, Debug)]
pub struct Entity {
    pub(crate) id: EntityId,
    pub(crate) parent: Option<EntityId>,
    pub(crate) children: Vec<EntityId>,
    pub(crate) pos: Point,
    pub(crate) bounding: Aabb,
    pub(crate) collider: Option<Collider>,
    pub(crate) dirty: bool,
    pub(crate) layer: i32,
    pub(crate) flags: EntityFlags,
    pub(crate) kind: EntityKind,
}

impl Entity {
    fn new(id: EntityId, pos: Point, layer: i32, kind: EntityKind) -> Self {
        Self {
            id,
            parent: None,
            children: Vec::new(),
            pos,
            bounding: Aabb::at(pos),
            collider: None,
            dirty: true,
            layer,
            flags: EntityFlags::default(),
            kind,
        }
    }

    /// The entity's id.
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// The parent, or `None` for roots and detached entities.
    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    /// Children in insertion order.
    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    /// Position (the center, for entities with their own geometry).
    pub fn pos(&self) -> Point {
        self.pos
    }

    /// World-space bounding box as of the last layout of this entity.
    ///
    /// Must not be read while the entity is dirty.
    pub fn bounding(&self) -> Aabb {
        debug_assert!(
            !self.dirty,
            "bounding box of {:?} read while dirty; run the layout pass first",
            self.id
        );
        self.bounding
    }

    /// Precise shape, if the entity has one.
    pub fn collider(&self) -> Option<&Collider> {
        self.collider.as_ref()
    }

    /// Whether the entity needs a layout update.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Layer; higher layers win hit ties.
    pub fn layer(&self) -> i32 {
        self.layer
    }

    /// Visibility and picking flags.
    pub fn flags(&self) -> EntityFlags {
        self.flags
    }

    /// Kind-specific data.
    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }

    /// Node data, if the entity is a node.
    pub fn as_node(&self) -> Option<&NodeData> {
        match &self.kind {
            EntityKind::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Wire data, if the entity is a wire.
    pub fn as_wire(&self) -> Option<&WireData> {
        match &self.kind {
            EntityKind::Wire(wire) => Some(wire),
            _ => None,
        }
    }
}

/// The entity scene: an arena of entities under a root, the grid index of
/// placed nodes, and the wire router.
///
/// Mutations mark entities dirty; geometry is recomputed by
/// [`Scene::update_layout`], which should run once per frame before queries.
///
/// ## Example
///
/// ```rust
/// use gridwire_scene::{GateKind, Scene};
/// use kurbo::Point;
///
/// let mut scene = Scene::new();
/// let and = scene.place_node(GateKind::And.template(), Point::new(60.0, 60.0));
/// scene.update_layout();
///
/// assert_eq!(scene.pick(Point::new(75.0, 75.0)), Some(and));
/// assert_eq!(scene.pick(Point::new(500.0, 500.0)), None);
/// ```
pub struct Scene {
    /// slots
    entities: Vec<Option<Entity>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    root: EntityId,
    pub(crate) grid: GridIndex<EntityId>,
    pub(crate) router: Router,
    pub(crate) config: SceneConfig,
}

impl core::fmt::Debug for Scene {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Scene")
            .field("entities_total", &self.entities.len())
            .field("entities_alive", &self.entity_count())
            .field("free_list", &self.free_list.len())
            .field("root", &self.root)
            .field("grid", &self.grid)
            .field("router", &self.router)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create an empty scene with the default configuration.
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default())
    }

    /// Create an empty scene.
    pub fn with_config(config: SceneConfig) -> Self {
        let mut scene = Self {
            entities: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: EntityId::new(0, 0),
            grid: GridIndex::new(config.cell_size),
            router: Router::with_max_iterations(config.max_route_iterations),
            config,
        };
        scene.root = scene.insert(Point::ZERO, WIRE_LAYER, EntityKind::Generic { extent: None });
        scene
    }

    /// The root entity. It cannot be destroyed or reparented.
    pub fn root(&self) -> EntityId {
        self.root
    }

    /// The scene configuration.
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// The grid index of placed nodes.
    pub fn grid(&self) -> &GridIndex<EntityId> {
        &self.grid
    }

    /// Number of live entities, the root included.
    pub fn entity_count(&self) -> usize {
        self.entities.iter().filter(|e| e.is_some()).count()
    }

    /// Returns true if `id` refers to a live entity.
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Access a live entity.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities
            .get(id.idx())?
            .as_ref()
            .filter(|e| e.id == id)
    }

    /// Access a live entity; panics if `id` is stale.
    pub(crate) fn entity(&self, id: EntityId) -> &Entity {
        self.get(id).expect("dangling EntityId")
    }

    pub(crate) fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities
            .get_mut(id.idx())?
            .as_mut()
            .filter(|e| e.id == id)
    }

    // --- creation ---

    fn insert(&mut self, pos: Point, layer: i32, kind: EntityKind) -> EntityId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            (idx, generation)
        } else {
            self.entities.push(None);
            self.generations.push(1);
            (self.entities.len() - 1, 1)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "EntityId uses 32-bit indices by design."
        )]
        let id = EntityId::new(idx as u32, generation);
        self.entities[idx] = Some(Entity::new(id, pos, layer, kind));
        id
    }

    /// Create a detached entity without geometry of its own.
    ///
    /// Attach it with [`Scene::add_child`]; its bounding box follows its
    /// children.
    pub fn create_group(&mut self, pos: Point) -> EntityId {
        self.insert(pos, WIRE_LAYER, EntityKind::Generic { extent: None })
    }

    /// Create a detached box of the given size centered on `pos`.
    pub fn create_box(&mut self, pos: Point, size: Size) -> EntityId {
        self.insert(
            pos,
            WIRE_LAYER,
            EntityKind::Generic {
                extent: Some(size),
            },
        )
    }

    /// Create a detached node, snapping `at` to the grid.
    ///
    /// The node is neither attached nor registered in the grid index; see
    /// [`Scene::place_node`] for both at once.
    pub fn create_node(&mut self, template: &'static NodeTemplate, at: Point) -> EntityId {
        let pos = snap_node_position(at, template.span(), self.config.cell_size);
        self.insert(pos, NODE_LAYER, EntityKind::Node(NodeData::new(template)))
    }

    /// Create a node under the root and register it in the grid index.
    pub fn place_node(&mut self, template: &'static NodeTemplate, at: Point) -> EntityId {
        let id = self.create_node(template, at);
        let root = self.root;
        self.add_child(root, id);
        self.register_footprint(id);
        id
    }

    pub(crate) fn insert_wire(&mut self, wire: WireData) -> EntityId {
        let pos = wire.start.anchor;
        self.insert(pos, WIRE_LAYER, EntityKind::Wire(wire))
    }

    // --- structure ---

    /// Attach `child` as the last child of `parent`.
    ///
    /// The child is detached from any previous parent first. Both old and new
    /// parent chains are marked dirty. Returns `false`, changing nothing, for
    /// stale ids, self-parenting, reparenting the root, and cycles.
    pub fn add_child(&mut self, parent: EntityId, child: EntityId) -> bool {
        if parent == child || child == self.root || !self.is_alive(parent) || !self.is_alive(child)
        {
            return false;
        }
        let mut ancestor = self.entity(parent).parent;
        while let Some(a) = ancestor {
            if a == child {
                return false;
            }
            ancestor = self.entity(a).parent;
        }

        if let Some(old) = self.entity(child).parent {
            self.unlink_parent(child, old);
            self.mark_dirty(old);
        }
        self.link_parent(child, parent);
        self.mark_dirty(parent);
        true
    }

    /// Detach `child` from `parent`.
    ///
    /// The child stays alive as a detached root; every entity in its subtree
    /// is unregistered from the grid index. Returns `false` if `child` is not
    /// a child of `parent`.
    pub fn remove_child(&mut self, parent: EntityId, child: EntityId) -> bool {
        if !self.is_alive(parent) || self.get(child).and_then(Entity::parent) != Some(parent) {
            return false;
        }
        self.unlink_parent(child, parent);
        self.mark_dirty(parent);
        for id in self.collect(child, |_| true) {
            self.unregister(id);
        }
        true
    }

    /// Destroy an entity and its subtree.
    ///
    /// Destroyed entities are unregistered from the grid index and their ids
    /// become stale. Wires attached to destroyed nodes are destroyed too.
    /// Returns `false` for stale ids and the root.
    pub fn destroy(&mut self, id: EntityId) -> bool {
        if id == self.root || !self.is_alive(id) {
            return false;
        }
        if let Some(parent) = self.entity(id).parent {
            self.unlink_parent(id, parent);
            self.mark_dirty(parent);
        }

        let subtree = self.collect(id, |_| true);
        let mut attached_wires = Vec::new();
        for &e in &subtree {
            self.unregister(e);
            let wire_nodes = match &self.entity(e).kind {
                EntityKind::Node(node) => {
                    attached_wires.extend(node.wires.iter().map(|link| link.wire));
                    None
                }
                EntityKind::Wire(wire) => Some((wire.start.node, wire.end.node)),
                EntityKind::Generic { .. } => None,
            };
            if let Some((a, b)) = wire_nodes {
                self.unlink_wire(a, e);
                self.unlink_wire(b, e);
            }
        }
        for e in subtree {
            self.entities[e.idx()] = None;
            self.free_list.push(e.idx());
        }
        for wire in attached_wires {
            self.destroy(wire);
        }
        tracing::debug!(?id, "entity destroyed");
        true
    }

    fn link_parent(&mut self, id: EntityId, parent: EntityId) {
        if let Some(p) = self.entity_mut(parent) {
            p.children.push(id);
        }
        if let Some(c) = self.entity_mut(id) {
            c.parent = Some(parent);
        }
    }

    fn unlink_parent(&mut self, id: EntityId, parent: EntityId) {
        if let Some(p) = self.entity_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(c) = self.entity_mut(id) {
            c.parent = None;
        }
    }

    fn unlink_wire(&mut self, node: EntityId, wire: EntityId) {
        if let Some(EntityKind::Node(data)) = self.entity_mut(node).map(|e| &mut e.kind) {
            data.wires.retain(|link| link.wire != wire);
        }
    }

    // --- mutation ---

    /// Mark an entity and its ancestors dirty.
    ///
    /// Walks up the parent chain and stops at the first entity that is
    /// already dirty, so marking a dirty entity again does nothing. Returns
    /// how many entities were newly marked.
    pub fn mark_dirty(&mut self, id: EntityId) -> usize {
        let mut marked = 0;
        let mut current = Some(id);
        while let Some(id) = current {
            let Some(entity) = self.entity_mut(id) else {
                break;
            };
            if entity.dirty {
                break;
            }
            entity.dirty = true;
            marked += 1;
            current = entity.parent;
        }
        marked
    }

    /// Move an entity.
    ///
    /// A node registered in the grid index moves to its new cells right
    /// away, so wires routed afterwards see where it is. Moving a node also
    /// refreshes the anchors of its wires and marks their routes stale; they
    /// are rerouted on the next [`Scene::update_layout`].
    pub fn set_position(&mut self, id: EntityId, pos: Point) -> Result<(), SceneError> {
        let entity = self
            .entity_mut(id)
            .ok_or(SceneError::StaleEntity(id))?;
        if entity.pos == pos {
            return Ok(());
        }
        entity.pos = pos;
        self.mark_dirty(id);
        if self.grid.contains(id) {
            self.update_grid(id)?;
        }
        self.refresh_wire_anchors(id);
        Ok(())
    }

    /// Move an entity by `delta`.
    pub fn translate(&mut self, id: EntityId, delta: Vec2) -> Result<(), SceneError> {
        let pos = self
            .get(id)
            .ok_or(SceneError::StaleEntity(id))?
            .pos;
        self.set_position(id, pos + delta)
    }

    /// Update the layer of an entity.
    pub fn set_layer(&mut self, id: EntityId, layer: i32) {
        if let Some(e) = self.entity_mut(id) {
            e.layer = layer;
        }
    }

    /// Update entity flags.
    pub fn set_flags(&mut self, id: EntityId, flags: EntityFlags) {
        if let Some(e) = self.entity_mut(id) {
            e.flags = flags;
        }
    }

    // --- layout ---

    /// Recompute one entity's collider and bounding box if it is dirty.
    ///
    /// Composite entities read their children's bounding boxes, so children
    /// must be updated first. Returns whether anything was recomputed.
    pub fn update_entity_layout(&mut self, id: EntityId) -> bool {
        let Some(entity) = self.get(id) else {
            return false;
        };
        if !entity.dirty {
            return false;
        }
        let bounding = self.compute_bounding(entity);
        let cell_size = self.config.cell_size;
        let Some(entity) = self.entity_mut(id) else {
            return false;
        };
        update_collider(entity, cell_size);
        entity.bounding = bounding;
        entity.dirty = false;
        true
    }

    fn compute_bounding(&self, entity: &Entity) -> Aabb {
        match &entity.kind {
            EntityKind::Generic { extent: Some(size) } => Aabb::from_center_size(entity.pos, *size),
            EntityKind::Generic { extent: None } => Aabb::union_all(entity.children.iter().map(|&c| {
                let child = self.entity(c);
                debug_assert!(!child.dirty, "children must be laid out before their parent");
                child.bounding
            }))
            .unwrap_or(Aabb::at(entity.pos)),
            EntityKind::Node(node) => {
                let geometry = NodeGeometry::new(node.template, entity.pos, self.config.cell_size);
                Aabb::from_center_size(entity.pos, geometry.outer)
            }
            EntityKind::Wire(wire) => wire.bounding().unwrap_or(Aabb::at(entity.pos)),
        }
    }

    /// The per-frame layout pass.
    ///
    /// Reroutes visible wires whose route is stale, then updates every dirty
    /// entity, children before parents, across every root in the arena
    /// (detached entities included). Returns the number of entities updated.
    pub fn update_layout(&mut self) -> usize {
        let rerouted = self.reroute_stale();

        // A clean entity has a clean subtree, so dirty subtrees are all we visit.
        let mut order = Vec::new();
        let mut stack: Vec<EntityId> = self
            .arena_roots()
            .filter(|e| e.dirty)
            .map(|e| e.id)
            .collect();
        stack.reverse();
        while let Some(id) = stack.pop() {
            let entity = self.entity(id);
            if !entity.dirty {
                continue;
            }
            order.push(id);
            stack.extend(entity.children.iter().rev().copied());
        }

        let mut updated = 0;
        for id in order.into_iter().rev() {
            if self.update_entity_layout(id) {
                updated += 1;
            }
        }
        tracing::trace!(updated, rerouted, "layout pass");
        updated
    }

    // --- queries ---

    /// Live entities without a parent: the root and detached subtrees.
    pub(crate) fn arena_roots(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.iter().flatten().filter(|e| e.parent.is_none())
    }

    /// Pre-order traversal from `root`, returning the ids `predicate` accepts.
    ///
    /// A rejected entity prunes its whole subtree. Children are visited in
    /// insertion order. Returns an empty vector for a stale `root`.
    pub fn collect<F>(&self, root: EntityId, predicate: F) -> Vec<EntityId>
    where
        F: FnMut(&Entity) -> bool,
    {
        if !self.is_alive(root) {
            return Vec::new();
        }
        self.collect_from(&[root], predicate)
    }

    /// Like [`Scene::collect`], but starting below `root`, which is never
    /// tested nor returned.
    pub fn collect_children<F>(&self, root: EntityId, predicate: F) -> Vec<EntityId>
    where
        F: FnMut(&Entity) -> bool,
    {
        match self.get(root) {
            Some(entity) => self.collect_from(&entity.children, predicate),
            None => Vec::new(),
        }
    }

    fn collect_from<F>(&self, start: &[EntityId], mut predicate: F) -> Vec<EntityId>
    where
        F: FnMut(&Entity) -> bool,
    {
        let mut out = Vec::new();
        let mut stack: Vec<EntityId> = start.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let entity = self.entity(id);
            if !predicate(entity) {
                continue;
            }
            out.push(id);
            stack.extend(entity.children.iter().rev().copied());
        }
        out
    }

    /// Pickable candidates under `point`, highest layer first.
    fn pick_candidates(&self, point: Point) -> Vec<EntityId> {
        let filter = QueryFilter::new().visible().pickable();
        let params = self.config.hit_params;
        let reach = params.fill_tolerance.max(params.stroke_tolerance);
        let mut candidates = self.collect_children(self.root, |e| {
            e.bounding().inflate(reach, reach).contains_point(point)
        });
        candidates.retain(|&id| filter.matches(self.entity(id).flags));
        // Stable: equal layers keep traversal order.
        candidates.sort_by_key(|&id| Reverse(self.entity(id).layer));
        candidates
    }

    fn hit_score(&self, id: EntityId, point: Point) -> Option<HitScore> {
        self.entity(id)
            .collider
            .as_ref()
            .and_then(|c| c.hit_test_local(point, &self.config.hit_params))
    }

    /// The topmost visible, pickable entity whose collider contains `point`.
    ///
    /// Candidates are gathered by bounding box below the root, ordered by
    /// layer (highest first, traversal order within a layer), and tested
    /// against their colliders with [`SceneConfig::hit_params`]. The first
    /// hit wins.
    pub fn pick(&self, point: Point) -> Option<EntityId> {
        self.pick_candidates(point)
            .into_iter()
            .find(|&id| self.hit_score(id, point).is_some())
    }

    /// Every visible, pickable entity hit at `point`, with its score.
    ///
    /// Ordered by layer, highest first; within a layer closer hits come
    /// first, and equal distances keep traversal order.
    pub fn hits(&self, point: Point) -> Vec<(EntityId, HitScore)> {
        let mut hits: Vec<(EntityId, HitScore)> = self
            .pick_candidates(point)
            .into_iter()
            .filter_map(|id| self.hit_score(id, point).map(|score| (id, score)))
            .collect();
        hits.sort_by(|(a, sa), (b, sb)| {
            self.entity(*b)
                .layer
                .cmp(&self.entity(*a).layer)
                .then_with(|| sa.cmp_distance(sb))
        });
        hits
    }

    /// Entities whose bounding box overlaps `viewport`, in draw order.
    pub fn visible(&self, viewport: Aabb, filter: QueryFilter) -> Vec<EntityId> {
        let mut out = self.collect_children(self.root, |e| e.bounding().overlaps(&viewport));
        out.retain(|&id| filter.matches(self.entity(id).flags));
        out
    }

    /// Entities whose bounding box lies entirely inside `area`.
    pub fn within(&self, area: Aabb) -> Vec<EntityId> {
        let mut out = self.collect_children(self.root, |e| e.bounding().overlaps(&area));
        out.retain(|&id| area.contains_aabb(&self.entity(id).bounding));
        out
    }
}

fn set_box(collider: &mut Option<Collider>, size: Size, center: Point) {
    match collider {
        Some(Collider::Box(b)) => b.update(size.width, size.height, center, b.angle),
        _ => *collider = Some(Collider::Box(BoxCollider::new(size.width, size.height, center))),
    }
}

fn update_collider(entity: &mut Entity, cell_size: f64) {
    let Entity {
        kind, collider, pos, ..
    } = entity;
    match kind {
        EntityKind::Generic { extent: Some(size) } => set_box(collider, *size, *pos),
        EntityKind::Generic { extent: None } => *collider = None,
        EntityKind::Node(node) => {
            let geometry = NodeGeometry::new(node.template, *pos, cell_size);
            set_box(collider, geometry.outer, *pos);
        }
        EntityKind::Wire(wire) => match collider {
            Some(Collider::Polyline(line)) => line.update(&wire.path, Some(wire.thickness)),
            _ => {
                *collider = Some(Collider::Polyline(PolylineCollider::new(
                    wire.path.clone(),
                    wire.thickness,
                )));
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::GateKind;
    use alloc::vec;
    use gridwire_hit::HitParams;

    #[test]
    fn liveness_create_destroy_reuse() {
        let mut scene = Scene::new();
        let root = scene.root();
        let a = scene.create_group(Point::ZERO);
        assert!(scene.add_child(root, a));
        assert!(scene.is_alive(a));
        assert_eq!(scene.entity_count(), 2);

        assert!(scene.destroy(a));
        assert!(!scene.is_alive(a));
        assert!(!scene.destroy(a));

        let b = scene.create_group(Point::ZERO);
        assert!(scene.is_alive(b));
        assert!(!scene.is_alive(a));
        assert_eq!(a.0, b.0, "freed slot is reused");
        assert!(b.1 > a.1, "generation must increase on reuse");
        assert!(!scene.destroy(root));
    }

    #[test]
    fn add_child_rejects_bad_links() {
        let mut scene = Scene::new();
        let root = scene.root();
        let a = scene.create_group(Point::ZERO);
        let b = scene.create_group(Point::ZERO);
        assert!(scene.add_child(root, a));
        assert!(scene.add_child(a, b));

        assert!(!scene.add_child(a, a), "self-parenting");
        assert!(!scene.add_child(b, a), "cycle");
        assert!(!scene.add_child(b, root), "root cannot be reparented");

        let gone = scene.create_group(Point::ZERO);
        scene.destroy(gone);
        assert!(!scene.add_child(a, gone));
        assert!(!scene.add_child(gone, a));
        assert_eq!(scene.get(b).unwrap().parent(), Some(a));
    }

    #[test]
    fn add_child_moves_between_parents() {
        let mut scene = Scene::new();
        let root = scene.root();
        let a = scene.create_group(Point::ZERO);
        let b = scene.create_group(Point::ZERO);
        let c = scene.create_group(Point::ZERO);
        scene.add_child(root, a);
        scene.add_child(root, b);
        scene.add_child(a, c);
        scene.update_layout();

        assert!(scene.add_child(b, c));
        assert!(scene.get(a).unwrap().children().is_empty());
        assert_eq!(scene.get(b).unwrap().children(), &[c]);
        assert!(scene.get(a).unwrap().is_dirty());
        assert!(scene.get(b).unwrap().is_dirty());
        assert!(scene.get(root).unwrap().is_dirty());
    }

    #[test]
    fn mark_dirty_stops_at_dirty_ancestor() {
        let mut scene = Scene::new();
        let root = scene.root();
        let p = scene.create_box(Point::ZERO, Size::new(10.0, 10.0));
        let c = scene.create_box(Point::ZERO, Size::new(4.0, 4.0));
        scene.add_child(root, p);
        scene.add_child(p, c);
        scene.update_layout();

        assert_eq!(scene.mark_dirty(c), 3);
        assert_eq!(scene.mark_dirty(c), 0);

        // Clean the parent by hand; re-marking the dirty child must not reach it.
        assert!(scene.update_entity_layout(p));
        assert_eq!(scene.mark_dirty(c), 0);
        assert!(!scene.get(p).unwrap().is_dirty());
        assert!(scene.get(c).unwrap().is_dirty());
    }

    #[test]
    fn dirty_entities_have_dirty_ancestors() {
        let mut scene = Scene::new();
        let root = scene.root();
        let a = scene.create_group(Point::ZERO);
        let b = scene.create_group(Point::ZERO);
        let c = scene.create_box(Point::new(3.0, 3.0), Size::new(2.0, 2.0));
        scene.add_child(root, a);
        scene.add_child(a, b);
        scene.add_child(b, c);
        scene.update_layout();

        scene.set_position(c, Point::new(9.0, 9.0)).unwrap();
        for id in [c, b, a, root] {
            assert!(scene.get(id).unwrap().is_dirty());
        }
    }

    #[test]
    fn bounding_is_union_of_direct_children() {
        let mut scene = Scene::new();
        let root = scene.root();
        let group = scene.create_group(Point::new(500.0, 500.0));
        let left = scene.create_box(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        let right = scene.create_box(Point::new(100.0, 40.0), Size::new(20.0, 20.0));
        scene.add_child(root, group);
        scene.add_child(group, left);
        scene.add_child(group, right);
        assert_eq!(scene.update_layout(), 4);

        let b = scene.get(group).unwrap().bounding();
        assert_eq!(b, Aabb::from_corners(Point::new(-5.0, -5.0), Point::new(110.0, 50.0)));
        assert_eq!(scene.get(root).unwrap().bounding(), b);

        // Only the dirty chain is revisited.
        scene.set_position(right, Point::new(200.0, 40.0)).unwrap();
        assert_eq!(scene.update_layout(), 3);
        assert_eq!(scene.get(group).unwrap().bounding().right(), 210.0);
        assert_eq!(scene.update_layout(), 0);
    }

    #[test]
    fn childless_group_is_a_point() {
        let mut scene = Scene::new();
        let lonely = scene.create_group(Point::new(7.0, 8.0));
        scene.update_layout();
        let b = scene.get(lonely).unwrap().bounding();
        assert_eq!(b, Aabb::at(Point::new(7.0, 8.0)));
        assert!(scene.get(lonely).unwrap().collider().is_none());
    }

    #[test]
    fn detached_entities_are_laid_out() {
        let mut scene = Scene::new();
        let floating = scene.create_box(Point::new(1.0, 1.0), Size::new(2.0, 2.0));
        scene.update_layout();
        assert!(!scene.get(floating).unwrap().is_dirty());
        assert!(scene.get(floating).unwrap().collider().is_some());
    }

    #[test]
    fn collect_is_preorder_and_prunes() {
        let mut scene = Scene::new();
        let root = scene.root();
        let a = scene.create_group(Point::ZERO);
        let a1 = scene.create_group(Point::ZERO);
        let a2 = scene.create_group(Point::ZERO);
        let b = scene.create_group(Point::ZERO);
        let b1 = scene.create_group(Point::ZERO);
        scene.add_child(root, a);
        scene.add_child(a, a1);
        scene.add_child(a, a2);
        scene.add_child(root, b);
        scene.add_child(b, b1);

        assert_eq!(scene.collect(root, |_| true), vec![root, a, a1, a2, b, b1]);
        assert_eq!(scene.collect_children(root, |_| true), vec![a, a1, a2, b, b1]);
        assert_eq!(scene.collect(root, |e| e.id() != a), vec![root, b, b1]);
        assert!(scene.collect(root, |e| e.id() != root).is_empty());
    }

    #[test]
    fn remove_child_detaches_and_unregisters() {
        let mut scene = Scene::new();
        let root = scene.root();
        let node = scene.place_node(GateKind::Not.template(), Point::new(75.0, 25.0));
        assert!(scene.grid().contains(node));

        assert!(!scene.remove_child(node, root));
        assert!(scene.remove_child(root, node));
        assert!(scene.is_alive(node));
        assert_eq!(scene.get(node).unwrap().parent(), None);
        assert!(!scene.grid().contains(node));
        assert_eq!(scene.grid().cell_count(), 0);
        assert!(!scene.remove_child(root, node));
    }

    #[test]
    fn remove_child_unregisters_the_whole_subtree() {
        let mut scene = Scene::new();
        let root = scene.root();
        let group = scene.create_group(Point::ZERO);
        scene.add_child(root, group);
        let inner = scene.place_node(GateKind::Not.template(), Point::new(75.0, 25.0));
        let kept = scene.place_node(GateKind::Not.template(), Point::new(375.0, 25.0));
        assert!(scene.add_child(group, inner));
        assert!(scene.grid().contains(inner));

        assert!(scene.remove_child(root, group));
        assert!(scene.is_alive(inner));
        assert_eq!(scene.get(inner).unwrap().parent(), Some(group));
        assert!(!scene.grid().contains(inner));
        assert!(!scene.grid().is_cell_occupied(1, 0));
        assert!(scene.grid().contains(kept));
        assert_eq!(scene.grid().cell_count(), 3);
    }

    #[test]
    fn tolerant_hits_rank_closer_entities_first() {
        let mut scene = Scene::with_config(SceneConfig {
            hit_params: HitParams {
                fill_tolerance: 5.0,
                ..HitParams::default()
            },
            ..SceneConfig::default()
        });
        let root = scene.root();
        let near_miss = scene.create_box(Point::new(0.0, 0.0), Size::new(20.0, 20.0));
        let under = scene.create_box(Point::new(20.0, 0.0), Size::new(20.0, 20.0));
        scene.add_child(root, near_miss);
        scene.add_child(root, under);
        scene.update_layout();

        // Both boxes within tolerance of x = 12; only `under` actually covers it.
        let point = Point::new(12.0, 0.0);
        assert_eq!(scene.pick(point), Some(near_miss), "pick keeps traversal order");
        let hits = scene.hits(point);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].0, under);
        assert_eq!(hits[0].1.distance, 0.0);
        assert_eq!(hits[1].0, near_miss);
        assert_eq!(hits[1].1.distance, 2.0);
        assert_eq!(scene.pick(Point::new(36.0, 0.0)), None);
    }

    #[test]
    fn pick_prefers_higher_layers_then_order() {
        let mut scene = Scene::new();
        let root = scene.root();
        let low = scene.create_box(Point::new(50.0, 50.0), Size::new(100.0, 100.0));
        let high = scene.create_box(Point::new(60.0, 60.0), Size::new(40.0, 40.0));
        let twin = scene.create_box(Point::new(60.0, 60.0), Size::new(40.0, 40.0));
        scene.add_child(root, low);
        scene.add_child(root, high);
        scene.add_child(root, twin);
        scene.set_layer(high, 2);
        scene.set_layer(twin, 2);
        scene.update_layout();

        assert_eq!(scene.pick(Point::new(60.0, 60.0)), Some(high));
        let hits: Vec<EntityId> = scene
            .hits(Point::new(60.0, 60.0))
            .iter()
            .map(|(id, _)| *id)
            .collect();
        assert_eq!(hits, vec![high, twin, low]);
        assert_eq!(scene.pick(Point::new(5.0, 5.0)), Some(low));
        assert_eq!(scene.pick(Point::new(500.0, 5.0)), None);

        scene.set_flags(high, EntityFlags::VISIBLE);
        assert_eq!(scene.pick(Point::new(60.0, 60.0)), Some(twin));
    }

    #[test]
    fn pick_needs_a_collider_hit() {
        let mut scene = Scene::new();
        let root = scene.root();
        let group = scene.create_group(Point::ZERO);
        let a = scene.create_box(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        let b = scene.create_box(Point::new(100.0, 100.0), Size::new(10.0, 10.0));
        scene.add_child(root, group);
        scene.add_child(group, a);
        scene.add_child(group, b);
        scene.update_layout();

        // Inside the group's bounding box but outside both children.
        assert_eq!(scene.pick(Point::new(50.0, 50.0)), None);
        assert_eq!(scene.pick(Point::new(100.0, 104.0)), Some(b));
    }

    #[test]
    fn visible_and_within_queries() {
        let mut scene = Scene::new();
        let root = scene.root();
        let a = scene.create_box(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        let b = scene.create_box(Point::new(100.0, 0.0), Size::new(10.0, 10.0));
        scene.add_child(root, a);
        scene.add_child(root, b);
        scene.set_flags(b, EntityFlags::PICKABLE);
        scene.update_layout();

        let view = Aabb::from_corners(Point::new(-50.0, -50.0), Point::new(96.0, 50.0));
        assert_eq!(scene.visible(view, QueryFilter::new()), vec![a, b]);
        assert_eq!(scene.visible(view, QueryFilter::new().visible()), vec![a]);
        assert_eq!(scene.within(view), vec![a]);
        let all = Aabb::from_corners(Point::new(-50.0, -50.0), Point::new(200.0, 50.0));
        assert_eq!(scene.within(all), vec![a, b]);
    }

    #[test]
    fn node_geometry_follows_position() {
        let mut scene = Scene::new();
        let node = scene.place_node(GateKind::And.template(), Point::new(60.0, 60.0));
        scene.update_layout();
        let e = scene.get(node).unwrap();
        assert_eq!(e.pos(), Point::new(75.0, 75.0));
        assert_eq!(e.layer(), NODE_LAYER);
        assert_eq!(e.bounding(), Aabb::new(Point::new(75.0, 75.0), 175.0, 175.0));
        assert!(e.collider().unwrap().contains(Point::new(-10.0, 75.0)));

        scene.translate(node, Vec2::new(50.0, 0.0)).unwrap();
        scene.update_layout();
        let e = scene.get(node).unwrap();
        assert_eq!(e.bounding().center, Point::new(125.0, 75.0));
        assert!(!e.collider().unwrap().contains(Point::new(-10.0, 75.0)));
    }

    #[test]
    fn stale_ids_are_reported() {
        let mut scene = Scene::new();
        let gone = scene.create_group(Point::ZERO);
        scene.destroy(gone);
        assert_eq!(
            scene.set_position(gone, Point::ZERO),
            Err(SceneError::StaleEntity(gone))
        );
        assert!(scene.get(gone).is_none());
        assert!(!scene.update_entity_layout(gone));
        assert!(scene.collect(gone, |_| true).is_empty());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "read while dirty")]
    fn dirty_bounding_read_panics_in_debug() {
        let mut scene = Scene::new();
        let e = scene.create_group(Point::ZERO);
        let _ = scene.get(e).unwrap().bounding();
    }
}
