//! Match engine — the core of the game.
//!
//! `MatchEngine` owns the hecs ECS world and the destructible terrain,
//! processes player commands, runs all systems in a fixed order, and
//! produces `MatchSnapshot`s. Completely headless, enabling
//! deterministic testing: same seed + same commands = same snapshots.

use std::collections::{HashMap, VecDeque};

use hecs::World;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use barrage_ai::flight::FlightEnv;
use barrage_ai::{solve_ballistic, solve_beam, AimSituation};
use barrage_core::commands::PlayerCommand;
use barrage_core::components::{Buffs, Combatant, Health, Loadout};
use barrage_core::constants::*;
use barrage_core::enums::{ArchetypeKind, BehaviorTag, ControlMode, GamePhase, TurnStage};
use barrage_core::events::FxEvent;
use barrage_core::state::MatchSnapshot;
use barrage_core::types::{Position, SimTime, Velocity};
use barrage_core::weapons::{weapon_spec, WeaponId};
use barrage_terrain::Heightfield;

use crate::systems;
use crate::systems::explosion::ExplosionRequest;
use crate::turn::{PlayerScore, TurnState};
use crate::world_setup::{self, PlayerSetup};

/// Configuration for starting a new match.
pub struct MatchConfig {
    /// RNG seed for determinism. Same seed = same match.
    pub seed: u64,
    /// Roster, indexed by player id.
    pub players: Vec<PlayerSetup>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            players: vec![
                PlayerSetup {
                    archetype: ArchetypeKind::Trooper,
                    control: ControlMode::Human,
                },
                PlayerSetup {
                    archetype: ArchetypeKind::Trooper,
                    control: ControlMode::Bot,
                },
            ],
        }
    }
}

/// The match engine. Owns the ECS world and all sim state.
pub struct MatchEngine {
    world: World,
    terrain: Heightfield,
    time: SimTime,
    phase: GamePhase,
    turn: TurnState,
    wind: f64,
    void_y: f64,
    rng: ChaCha8Rng,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<hecs::Entity>,
    fx_events: Vec<FxEvent>,
    explosions: Vec<ExplosionRequest>,
    scores: HashMap<u32, PlayerScore>,
    config: MatchConfig,
}

impl MatchEngine {
    /// Create a new match engine with the given config.
    pub fn new(config: MatchConfig) -> Self {
        Self {
            world: World::new(),
            terrain: Heightfield::new(Vec::new()),
            time: SimTime::default(),
            phase: GamePhase::default(),
            turn: TurnState::default(),
            wind: 0.0,
            void_y: VOID_START_Y,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            fx_events: Vec::new(),
            explosions: Vec::new(),
            scores: HashMap::new(),
            config,
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting
    /// snapshot.
    pub fn tick(&mut self) -> MatchSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Active {
            self.run_bot_turn();
            self.run_systems();
            self.time.advance();
        }

        let events = std::mem::take(&mut self.fx_events);
        systems::snapshot::build(
            &self.world,
            &self.terrain,
            &self.time,
            self.phase,
            &self.turn,
            self.wind,
            self.void_y,
            &self.scores,
            events,
        )
    }

    /// Get the current match phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get the current turn state.
    pub fn turn(&self) -> TurnState {
        self.turn
    }

    /// Get the current void line.
    pub fn void_y(&self) -> f64 {
        self.void_y
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get a read-only reference to the terrain.
    pub fn terrain(&self) -> &Heightfield {
        &self.terrain
    }

    /// Get a read-only reference to the score table.
    pub fn scores(&self) -> &HashMap<u32, PlayerScore> {
        &self.scores
    }

    /// Get mutable world access (for tests that stage scenarios).
    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Inject a long-lived delayed effect (for watchdog tests).
    #[cfg(test)]
    pub fn spawn_stuck_effect(&mut self, remaining_secs: f64) {
        use barrage_core::components::{DelayedEffect, EffectKind};
        self.world.spawn((
            Position::new(WORLD_WIDTH / 2.0, 100.0),
            DelayedEffect {
                kind: EffectKind::Fuse {
                    owner: 0,
                    weapon: WeaponId::Shell,
                    damage: 0.0,
                    radius: 1.0,
                },
                remaining_secs,
            },
        ));
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command. Invalid commands are no-ops.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::StartMatch => {
                if matches!(self.phase, GamePhase::Lobby | GamePhase::MatchOver) {
                    self.start_match();
                }
            }
            PlayerCommand::SelectWeapon { player_id, weapon } => {
                for (_entity, (combatant, loadout)) in
                    self.world.query_mut::<(&Combatant, &mut Loadout)>()
                {
                    if combatant.player_id == player_id {
                        loadout.selected = weapon;
                    }
                }
            }
            PlayerCommand::Fire {
                player_id,
                angle_rad,
                power,
            } => {
                self.fire(player_id, angle_rad, power);
            }
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
        }
    }

    /// Reset all match state and spawn the roster onto fresh terrain.
    fn start_match(&mut self) {
        let spawn_xs = world_setup::spawn_columns(self.config.players.len());
        self.terrain = barrage_procgen::generate(
            WORLD_WIDTH as usize,
            &spawn_xs,
            EDGE_MARGIN,
            &mut self.rng,
        );

        self.world.clear();
        world_setup::setup_match(&mut self.world, &self.terrain, &self.config.players);

        self.scores = (0..self.config.players.len() as u32)
            .map(|id| (id, PlayerScore::default()))
            .collect();
        self.time = SimTime::default();
        self.turn = TurnState::default();
        self.wind = self.rng.gen_range(-TURN_WIND_MAX..TURN_WIND_MAX);
        self.void_y = VOID_START_Y;
        self.explosions.clear();
        self.despawn_buffer.clear();
        self.phase = GamePhase::Active;
        self.fx_events.push(FxEvent::TurnStarted {
            player_id: self.turn.active_player,
            turn: self.turn.number,
        });
    }

    /// Fire the active combatant's selected weapon. A no-op unless it
    /// is this player's aiming stage and the shooter is alive.
    fn fire(&mut self, player_id: u32, angle_rad: f64, power: f64) {
        if self.phase != GamePhase::Active
            || self.turn.stage != TurnStage::Aiming
            || self.turn.active_player != player_id
        {
            return;
        }
        let Some((entity, origin, weapon)) = self.find_shooter(player_id) else {
            return;
        };
        let spec = weapon_spec(weapon);

        self.scores.entry(player_id).or_default().shots_fired += 1;
        self.fx_events.push(FxEvent::Fired { player_id, weapon });

        if let BehaviorTag::Beam { hit_width } = spec.behavior {
            systems::beams::fire(
                &mut self.world,
                &mut self.terrain,
                player_id,
                &origin,
                angle_rad,
                &spec,
                hit_width,
                self.void_y,
                &mut self.scores,
                &mut self.fx_events,
            );
        } else {
            // Damage/blast boosts are consumed by this shot.
            let (damage_mult, blast_bonus, extra_bounces) =
                if let Ok(mut buffs) = self.world.get::<&mut Buffs>(entity) {
                    let captured = (buffs.damage_mult, buffs.blast_bonus, buffs.extra_bounces);
                    buffs.damage_mult = 1.0;
                    buffs.blast_bonus = 0.0;
                    buffs.extra_bounces = 0;
                    captured
                } else {
                    (1.0, 0.0, 0)
                };

            let power = power.clamp(0.05, 1.0);
            let muzzle = Position::new(
                origin.x + angle_rad.cos() * MUZZLE_OFFSET,
                origin.y - angle_rad.sin() * MUZZLE_OFFSET,
            );
            let mut proj =
                world_setup::make_projectile(player_id, weapon, spec.behavior, self.time.tick);
            proj.damage_mult = damage_mult;
            proj.blast_bonus = blast_bonus;
            proj.max_bounces += extra_bounces;
            self.world.spawn((
                muzzle,
                Velocity::from_angle_speed(angle_rad, power * spec.speed),
                proj,
            ));
        }

        self.turn.stage = TurnStage::Resolving;
        self.turn.resolve_start_tick = self.time.tick;
    }

    /// Find a living combatant and its loadout by player id.
    fn find_shooter(&self, player_id: u32) -> Option<(hecs::Entity, Position, WeaponId)> {
        let mut query = self
            .world
            .query::<(&Combatant, &Position, &Health, &Loadout)>();
        query
            .iter()
            .find(|(_, (c, _, h, _))| c.player_id == player_id && h.alive())
            .map(|(entity, (_, pos, _, loadout))| (entity, *pos, loadout.selected))
    }

    /// If the active combatant is bot-controlled and still aiming,
    /// solve and fire its shot.
    fn run_bot_turn(&mut self) {
        if self.turn.stage != TurnStage::Aiming {
            return;
        }
        let active = self.turn.active_player;

        let shooter = {
            let mut query = self
                .world
                .query::<(&Combatant, &Position, &Health, &Loadout)>();
            query
                .iter()
                .find(|(_, (c, _, h, _))| {
                    c.player_id == active && h.alive() && c.control == ControlMode::Bot
                })
                .map(|(_, (_, pos, _, loadout))| (*pos, loadout.selected))
        };
        let Some((origin, weapon)) = shooter else {
            return;
        };

        let target = {
            let mut query = self.world.query::<(&Combatant, &Position, &Health)>();
            query
                .iter()
                .filter(|(_, (c, _, h))| c.player_id != active && h.alive())
                .map(|(_, (_, pos, _))| *pos)
                .min_by(|a, b| {
                    origin
                        .range_to(a)
                        .partial_cmp(&origin.range_to(b))
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
        };
        let Some(target) = target else {
            return;
        };

        let spec = weapon_spec(weapon);
        let sit = AimSituation {
            terrain: &self.terrain,
            env: FlightEnv::standard(self.wind, self.void_y),
            origin,
            target,
            muzzle_speed: spec.speed,
            blast_radius: spec.blast_radius.max(20.0),
            projectile_radius: spec.projectile_radius.max(2.0),
        };
        let solution = if let BehaviorTag::Beam { hit_width } = spec.behavior {
            solve_beam(&sit, spec.max_bounces, hit_width, &mut self.rng)
        } else {
            solve_ballistic(&sit)
        };

        self.fire(active, solution.angle_rad, solution.power);
    }

    /// Run all systems in order. The ordering is a correctness
    /// invariant: forces before integration, contact before resolution,
    /// resolution before the gate.
    fn run_systems(&mut self) {
        let env = FlightEnv::standard(self.wind, self.void_y);

        // 1. Delayed effects (fuses, beacons, airdrops, fields, attractors)
        systems::effects::run(
            &mut self.world,
            &mut self.terrain,
            &mut self.rng,
            &mut self.explosions,
            &mut self.scores,
            &mut self.fx_events,
            &mut self.despawn_buffer,
            self.void_y,
            self.time.tick,
        );
        // 2. Projectile flight (gravity, wind, attractors, homing, walls)
        systems::flight::run(&mut self.world, &env, &mut self.fx_events);
        // 3. Combatant knockback physics
        systems::locomotion::run(
            &mut self.world,
            &self.terrain,
            self.void_y,
            &mut self.fx_events,
        );
        // 4. Behavior-specific terrain/contact resolution
        systems::contact::run(
            &mut self.world,
            &mut self.terrain,
            &mut self.explosions,
            &mut self.scores,
            &mut self.fx_events,
            &mut self.despawn_buffer,
            self.void_y,
            self.time.tick,
        );
        // 5. Explosion resolution (damage, knockback, terrain, chains)
        systems::explosion::run(
            &mut self.world,
            &mut self.terrain,
            &mut self.explosions,
            &mut self.rng,
            &mut self.scores,
            &mut self.fx_events,
            &mut self.void_y,
            self.time.tick,
        );
        // 6. Cleanup (despawn buffer, dead combatants)
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
        // 7. Completion gate (quiescence, watchdog, turn advancement)
        systems::gate::run(
            &mut self.world,
            &self.terrain,
            &mut self.rng,
            &mut self.fx_events,
            &mut self.turn,
            &mut self.phase,
            &mut self.wind,
            self.time.tick,
        );
    }
}
