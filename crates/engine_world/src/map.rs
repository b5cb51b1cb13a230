//! The map: the owner of every live actor.
//!
//! All actor mutation funnels through the map — spawning, per-tick
//! updates, contact routing, signal dispatch, and removal. Handlers
//! receive a [`MapEnv`] (the world services minus the actor storage), so
//! no actor is ever borrowed while another handler runs; the actor being
//! handled is checked out of the arena for the duration of its call.
//!
//! Callers that need a consistent view of actor state across threads must
//! hold the tick lock for the duration of the read (see `engine_runtime`).

use std::collections::HashMap;
use std::sync::Arc;

use glam::Vec3;
use slotmap::SlotMap;
use tracing::debug;

use engine_assets::{AssetSource, MemoryAssets, ModelCache, ModelDefinition};
use engine_param::{Color, KvList, Param};
use engine_physics::{
    BodyCreationSettings, BodyId, BodyInterface, ContactPhase, MotionType, ObjectLayer, Shape,
    Transform,
};

use crate::actor::{Actor, ActorConnection, ActorId, ACTOR_OUTPUT_KILLED, ACTOR_OUTPUT_SPAWNED};
use crate::audio::{AudioOutput, NullAudio};
use crate::player::Player;
use crate::registry::ActorRegistry;
use crate::signal::{Delivery, SignalAction, SignalQueue, SignalTarget};
use crate::wall::ActorWall;

/// World services available to actor hooks: everything the map owns except
/// the actor storage itself.
///
/// Handlers mutate other actors only indirectly — by firing signals or
/// requesting kills, which the map applies once the current handler
/// returns.
pub struct MapEnv {
    /// The physics backend.
    pub physics: Box<dyn BodyInterface>,
    /// The audio seam.
    pub audio: Box<dyn AudioOutput>,
    /// Asset retrieval for model/texture loads.
    pub assets: Box<dyn AssetSource>,
    /// Shared model definitions.
    pub models: ModelCache,
    /// The player.
    pub player: Player,
    /// The map's I/O proxy singleton, if one was spawned.
    pub io_proxy: Option<ActorId>,
    /// Completed physics ticks. The first tick observes the value 1.
    pub physics_tick: u64,
    /// Sky texture path.
    pub sky_texture: String,
    /// Rich-presence icon name from the map header.
    pub presence_icon: String,
    /// Rich-presence display name from the map header.
    pub presence_name: String,
    pub fog_color: Color,
    pub fog_start: f32,
    pub fog_end: f32,
    pub(crate) names: Vec<(String, ActorId)>,
    pub(crate) signals: SignalQueue,
}

impl MapEnv {
    /// Fire a named output from `sender`: enqueue one delivery per matching
    /// connection. Targets resolve by name when the delivery is applied,
    /// not now.
    pub fn fire_output(&mut self, sender: &Actor, output: &str, default_param: &Param) {
        for (index, connection) in sender.matching_connections(output) {
            let param = if connection.param_override.is_none() {
                default_param.clone()
            } else {
                connection.param_override.clone()
            };
            self.signals.push(SignalAction::Deliver(Delivery {
                sender: sender.id(),
                connection: Some((sender.id(), index)),
                refire_cap: connection.num_refires,
                target: SignalTarget::Named(connection.target_name.clone()),
                input: connection.target_input.clone(),
                param,
            }));
        }
    }

    /// Directly trigger an input on a specific actor.
    pub fn trigger_input(&mut self, sender: ActorId, target: ActorId, input: &str, param: Param) {
        debug!(?sender, ?target, input, "triggering input");
        self.signals.push(SignalAction::Deliver(Delivery {
            sender,
            connection: None,
            refire_cap: 0,
            target: SignalTarget::Direct(target),
            input: input.to_string(),
            param,
        }));
    }

    /// Request removal of an actor. Applied after the current handler
    /// returns.
    pub fn kill(&mut self, target: ActorId) {
        self.signals.push(SignalAction::Kill(target));
    }

    /// Create a physics body owned by `actor` and attach it. The body's
    /// user data is the actor's handle.
    pub fn attach_body(&mut self, actor: &mut Actor, settings: BodyCreationSettings) -> BodyId {
        let settings = settings.with_user_data(actor.id().to_user_data());
        let body = self.physics.create_body(&settings);
        actor.body = body;
        body
    }

    /// Create a collisionless marker body so a logical actor still has a
    /// position in the world.
    pub fn attach_empty_body(&mut self, actor: &mut Actor, transform: &Transform) -> BodyId {
        self.attach_body(
            actor,
            BodyCreationSettings::new(
                Shape::Empty,
                *transform,
                MotionType::Static,
                ObjectLayer::Static,
            ),
        )
    }

    /// Load (or fetch the cached) model at `path`. Never fails; broken
    /// models come back as placeholders.
    pub fn load_model(&mut self, path: &str) -> Arc<ModelDefinition> {
        self.models.load(self.assets.as_mut(), path)
    }

    /// Handles of every name-table entry matching `name`. Entries are
    /// unlinked on removal, so these are live at the time of the call.
    #[must_use]
    pub fn named_ids(&self, name: &str) -> Vec<ActorId> {
        self.names
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, id)| *id)
            .collect()
    }

    /// First name-table entry matching `name`.
    #[must_use]
    pub fn first_named(&self, name: &str) -> Option<ActorId> {
        self.names
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, id)| *id)
    }

    pub(crate) fn unlink_name(&mut self, id: ActorId) {
        self.names.retain(|(_, entry)| *entry != id);
    }
}

/// Renderable state exposed per live actor. The renderer submits draws
/// from this and nothing else.
#[derive(Debug)]
pub struct RenderView<'a> {
    pub id: ActorId,
    pub transform: Transform,
    pub model: Option<&'a Arc<ModelDefinition>>,
    pub skin: u32,
    pub lod: u32,
    pub color: Color,
    pub wall: Option<&'a ActorWall>,
}

/// The world container: live actors plus [`MapEnv`].
pub struct Map {
    actors: SlotMap<ActorId, Option<Actor>>,
    /// World services. Public so game systems can reach the player,
    /// physics, and fog state under the tick lock.
    pub env: MapEnv,
}

impl Map {
    /// Create an empty map over a physics backend. The player and its
    /// character body are created immediately.
    #[must_use]
    pub fn new(mut physics: Box<dyn BodyInterface>) -> Self {
        let player = Player::new(physics.as_mut());
        Self {
            actors: SlotMap::with_key(),
            env: MapEnv {
                physics,
                audio: Box::new(NullAudio),
                assets: Box::new(MemoryAssets::new()),
                models: ModelCache::new(),
                player,
                io_proxy: None,
                physics_tick: 0,
                sky_texture: "texture/level/sky_test".to_string(),
                presence_icon: String::new(),
                presence_name: String::new(),
                fog_color: Color::from_packed(0xff00_0000),
                fog_start: 10.0,
                fog_end: 30.0,
                names: Vec::new(),
                signals: SignalQueue::default(),
            },
        }
    }

    /// Replace the audio seam.
    #[must_use]
    pub fn with_audio(mut self, audio: Box<dyn AudioOutput>) -> Self {
        self.env.audio = audio;
        self
    }

    /// Replace the asset source.
    #[must_use]
    pub fn with_assets(mut self, assets: Box<dyn AssetSource>) -> Self {
        self.env.assets = assets;
        self
    }

    /// Spawn an actor with no pre-wired connections.
    ///
    /// # Panics
    ///
    /// Panics if `type_name` is not registered (fatal content defect).
    pub fn spawn(
        &mut self,
        registry: &ActorRegistry,
        type_name: &str,
        transform: Transform,
        params: KvList,
    ) -> ActorId {
        self.spawn_wired(registry, type_name, transform, params, Vec::new())
    }

    /// Spawn an actor with level-authored connections attached before its
    /// `spawned` output fires.
    ///
    /// The params list is consumed by the constructor call; kinds that need
    /// values past init must copy them into their state.
    pub fn spawn_wired(
        &mut self,
        registry: &ActorRegistry,
        type_name: &str,
        transform: Transform,
        mut params: KvList,
        connections: Vec<ActorConnection>,
    ) -> ActorId {
        let definition = registry.definition(type_name);
        let id = self.actors.insert(None);
        let mut actor = Actor::new(id, definition);
        actor.connections = connections;
        let init = actor.definition().init;
        init(&mut actor, &mut params, &transform, &mut self.env);
        self.actors[id] = Some(actor);
        self.fire_output(id, ACTOR_OUTPUT_SPAWNED, Param::None);
        id
    }

    /// Borrow a live actor.
    #[must_use]
    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id).and_then(Option::as_ref)
    }

    /// Mutably borrow a live actor.
    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(id).and_then(Option::as_mut)
    }

    /// Number of live actors.
    #[must_use]
    pub fn actor_count(&self) -> usize {
        self.actors.values().filter(|slot| slot.is_some()).count()
    }

    /// Snapshot of live actor handles.
    #[must_use]
    pub fn actor_ids(&self) -> Vec<ActorId> {
        self.actors
            .iter()
            .filter_map(|(id, slot)| slot.is_some().then_some(id))
            .collect()
    }

    /// Register `id` in the name table. Names are level-authoring
    /// identifiers; several actors may share one.
    pub fn name_actor(&mut self, id: ActorId, name: impl Into<String>) {
        self.env.names.push((name.into(), id));
    }

    /// First live actor with the given name.
    #[must_use]
    pub fn actor_by_name(&self, name: &str) -> Option<ActorId> {
        self.env
            .names
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, id)| *id)
            .find(|id| self.actor(*id).is_some())
    }

    /// Every live actor with the given name.
    #[must_use]
    pub fn actors_by_name(&self, name: &str) -> Vec<ActorId> {
        self.env
            .names
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, id)| *id)
            .filter(|id| self.actor(*id).is_some())
            .collect()
    }

    /// Fire a named output from `sender` and run the resulting propagation
    /// chain to completion. A dead `sender` is a silent no-op.
    pub fn fire_output(&mut self, sender: ActorId, output: &str, param: Param) {
        if let Some(Some(actor)) = self.actors.get(sender) {
            self.env.fire_output(actor, output, &param);
        }
        self.dispatch();
    }

    /// Directly trigger an input on `target` and run the chain.
    pub fn trigger_input(&mut self, sender: ActorId, target: ActorId, input: &str, param: Param) {
        self.env.trigger_input(sender, target, input, param);
        self.dispatch();
    }

    /// Lifecycle-aware removal: fires the `killed` output, unlinks the
    /// name, runs the destroy hook, removes the physics body, and frees
    /// the actor. Safe to call for an already-removed handle.
    pub fn remove_actor(&mut self, id: ActorId) {
        self.env.kill(id);
        self.dispatch();
    }

    /// Low-level teardown without the `killed` signal. Used when firing
    /// signals into a half-destroyed world would be wrong — full map
    /// teardown, or surgical cleanup.
    pub fn free_actor(&mut self, id: ActorId) {
        let Some(mut actor) = self.checkout(id) else {
            return;
        };
        if self.env.io_proxy == Some(id) {
            self.env.io_proxy = None;
        }
        let destroy = actor.definition().destroy;
        destroy(&mut actor, &mut self.env);
        if actor.body.is_valid() {
            self.env.physics.remove_body(actor.body);
        }
        self.actors.remove(id);
    }

    /// One fixed-timestep tick: update every live actor, step physics,
    /// route player contacts, and sync the player transform. `delta` is
    /// the tick length as a fraction of the nominal tick period.
    ///
    /// Actors removed mid-traversal do not update later in the same pass.
    pub fn tick(&mut self, delta: f64) {
        self.env.physics_tick += 1;

        for id in self.actor_ids() {
            let Some(mut actor) = self.checkout(id) else {
                continue;
            };
            let update = actor.definition().update;
            update(&mut actor, delta, &mut self.env);
            self.check_in(id, actor);
            self.dispatch();
        }

        let events = self.env.physics.step(delta as f32);
        let player_body = self.env.player.body;
        for event in events {
            let (actor_body, contact_body) = if event.other == player_body {
                (event.body, event.other)
            } else if event.body == player_body {
                (event.other, event.body)
            } else {
                continue;
            };
            let Some(user_data) = self.env.physics.user_data(actor_body) else {
                continue;
            };
            if user_data == 0 {
                continue;
            }
            let id = ActorId::from_user_data(user_data);
            let Some(mut actor) = self.checkout(id) else {
                continue;
            };
            let hook = match event.phase {
                ContactPhase::Added => actor.definition().on_player_contact_added,
                ContactPhase::Persisted => actor.definition().on_player_contact_persisted,
                ContactPhase::Removed => actor.definition().on_player_contact_removed,
            };
            hook(&mut actor, contact_body, &mut self.env);
            self.check_in(id, actor);
            self.dispatch();
        }

        if let Some(transform) = self.env.physics.body_transform(player_body) {
            self.env.player.transform = transform;
        }
    }

    /// Recompute every actor's LOD index from the camera position. Returns
    /// `true` if any index changed.
    ///
    /// Called only from the LOD thread's coordinated window — the actor
    /// list must not be mutated concurrently.
    pub fn recompute_lods(&mut self, camera_position: Vec3, lod_multiplier: f32) -> bool {
        let mut changed = false;
        for slot in self.actors.values_mut() {
            let Some(actor) = slot.as_mut() else {
                continue;
            };
            let Some(model) = actor.model.as_ref() else {
                continue;
            };
            if model.lod_count() <= 1 {
                continue;
            }
            let Some(transform) = self.env.physics.body_transform(actor.body) else {
                continue;
            };
            let distance_squared = transform.position.distance_squared(camera_position);
            let mut lod = actor.current_lod as usize;
            while lod != 0 && model.lods[lod].distance_squared * lod_multiplier > distance_squared {
                lod -= 1;
                changed = true;
            }
            while model.lod_count() > lod + 1
                && model.lods[lod + 1].distance_squared * lod_multiplier <= distance_squared
            {
                lod += 1;
                changed = true;
            }
            actor.current_lod = lod as u32;
        }
        changed
    }

    /// Visit the renderable state of every live actor that has something
    /// to draw.
    pub fn visit_renderables(&self, mut visit: impl FnMut(RenderView<'_>)) {
        for (id, slot) in &self.actors {
            let Some(actor) = slot.as_ref() else {
                continue;
            };
            if actor.model.is_none() && actor.wall.is_none() {
                continue;
            }
            let transform = self
                .env
                .physics
                .body_transform(actor.body)
                .unwrap_or_default();
            visit(RenderView {
                id,
                transform,
                model: actor.model.as_ref(),
                skin: actor.current_skin,
                lod: actor.current_lod,
                color: actor.mod_color,
                wall: actor.wall.as_ref(),
            });
        }
    }

    /// Run every live actor's UI render hook.
    pub fn render_ui(&self) {
        for slot in self.actors.values() {
            if let Some(actor) = slot.as_ref() {
                (actor.definition().render_ui)(actor);
            }
        }
    }

    /// Free every actor without firing signals and drop pending ones.
    pub fn clear(&mut self) {
        for id in self.actor_ids() {
            self.free_actor(id);
        }
        self.env.names.clear();
        self.env.signals.clear();
        self.env.io_proxy = None;
    }

    fn checkout(&mut self, id: ActorId) -> Option<Actor> {
        self.actors.get_mut(id).and_then(Option::take)
    }

    fn check_in(&mut self, id: ActorId, actor: Actor) {
        if let Some(slot) = self.actors.get_mut(id) {
            *slot = Some(actor);
        }
    }

    /// Drain the signal queue. One call is one propagation chain: refire
    /// caps are counted within it.
    fn dispatch(&mut self) {
        let mut refires: HashMap<(ActorId, usize), u64> = HashMap::new();
        while let Some(action) = self.env.signals.pop() {
            match action {
                SignalAction::Deliver(delivery) => {
                    if let Some(key) = delivery.connection {
                        let count = refires.entry(key).or_insert(0);
                        *count += 1;
                        if *count > delivery.refire_cap.saturating_add(1) {
                            continue;
                        }
                    }
                    let targets: Vec<ActorId> = match &delivery.target {
                        SignalTarget::Direct(id) => vec![*id],
                        SignalTarget::Named(name) => self.env.named_ids(name),
                    };
                    for target in targets {
                        // Unresolved, removed, or checked-out targets are
                        // skipped silently; stale wires are normal in
                        // authored content.
                        let Some(mut actor) = self.checkout(target) else {
                            continue;
                        };
                        if let Some(handler) = actor.definition().input_handler(&delivery.input) {
                            handler(&mut actor, delivery.sender, &delivery.param, &mut self.env);
                        }
                        self.check_in(target, actor);
                    }
                }
                SignalAction::Kill(id) => self.process_kill(id),
            }
        }
    }

    fn process_kill(&mut self, id: ActorId) {
        let Some(mut actor) = self.checkout(id) else {
            return;
        };
        self.env
            .fire_output(&actor, ACTOR_OUTPUT_KILLED, &Param::None);
        self.env.unlink_name(id);
        if self.env.io_proxy == Some(id) {
            self.env.io_proxy = None;
        }
        let destroy = actor.definition().destroy;
        destroy(&mut actor, &mut self.env);
        if actor.body.is_valid() {
            self.env.physics.remove_body(actor.body);
        }
        self.actors.remove(id);
    }
}

impl Drop for Map {
    fn drop(&mut self) {
        self.clear();
        let player_body = self.env.player.body;
        self.env.physics.remove_body(player_body);
    }
}
