//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- World bounds ---

/// Arena width in world units.
pub const WORLD_WIDTH: f64 = 2400.0;

/// Arena height in world units (y grows downward).
pub const WORLD_HEIGHT: f64 = 1400.0;

/// Sentinel surface height for out-of-range terrain queries.
pub const WORLD_BOTTOM_Y: f64 = WORLD_HEIGHT;

/// Initial void line: anything below this y is gone.
pub const VOID_START_Y: f64 = 1320.0;

/// Highest y the void line can be raised to.
pub const VOID_MIN_Y: f64 = 560.0;

/// Highest y a raised terrain column may reach.
pub const MIN_SURFACE_Y: f64 = 140.0;

// --- Ballistics ---

/// Downward gravitational acceleration (units/s²).
pub const GRAVITY: f64 = 240.0;

/// Restitution applied when reflecting off the world walls.
pub const WALL_RESTITUTION: f64 = 0.9;

/// Restitution applied when reflecting off terrain (pinball-style shots).
pub const TERRAIN_RESTITUTION: f64 = 0.85;

/// Minimum speed after a terrain rebound; slower rebounds are scaled up.
pub const MIN_REBOUND_SPEED: f64 = 110.0;

/// Maximum lateral wind acceleration magnitude (units/s²).
pub const TURN_WIND_MAX: f64 = 60.0;

/// Finite-difference half-width for terrain slope sampling.
pub const SLOPE_SAMPLE_DX: f64 = 3.0;

// --- Combatants ---

/// Combatant collision radius.
pub const COMBATANT_RADIUS: f64 = 16.0;

/// Starting hit points.
pub const MAX_HEALTH: f64 = 100.0;

/// Speed below which a grounded combatant counts as settled.
pub const SETTLE_SPEED_EPS: f64 = 1.0;

/// Distance from the combatant center at which projectiles spawn.
pub const MUZZLE_OFFSET: f64 = COMBATANT_RADIUS + 6.0;

// --- Explosions ---

/// Knockback reaches this multiple of the blast radius.
pub const KNOCKBACK_RADIUS_FACTOR: f64 = 1.5;

/// Base knockback impulse at the blast center (units/s).
pub const KNOCKBACK_IMPULSE: f64 = 240.0;

/// Vertical component of knockback is scaled by this factor.
pub const KNOCKBACK_VERTICAL_FACTOR: f64 = 0.55;

/// Inner direct-hit zone as a fraction of the blast radius.
pub const DIRECT_HIT_FRACTION: f64 = 0.3;

/// Damage multiplier inside the direct-hit zone.
pub const DIRECT_HIT_MULT: f64 = 1.4;

/// Hard cap on the escalating-bounce damage bonus.
pub const ESCALATOR_BONUS_CAP: f64 = 60.0;

/// Delay before a chain-arc jump detonates (seconds).
pub const FUSE_CHAIN_DELAY_SECS: f64 = 0.25;

/// Per-stage damage decay for staged blasts.
pub const STAGE_DAMAGE_FACTOR: f64 = 0.8;

// --- Fragments ---

/// Maximum split generations; children beyond this explode instead.
pub const SPLIT_DEPTH_LIMIT: u8 = 2;

/// Damage scale applied to each split generation.
pub const CHILD_DAMAGE_FACTOR: f64 = 0.6;

/// Blast radius scale applied to each split generation.
pub const CHILD_RADIUS_FACTOR: f64 = 0.75;

/// Half-angle of the fragment fan (radians).
pub const SPLIT_SPREAD_RAD: f64 = 0.8;

// --- Rolling / drilling / burrowing ---

/// Per-tick horizontal friction for surface rollers.
pub const ROLLER_FRICTION: f64 = 0.985;

/// Downhill acceleration scale for rollers (units/s² per unit slope).
pub const ROLLER_SLOPE_ACCEL: f64 = 180.0;

/// Speed below which a roller starts its stop-grace countdown.
pub const ROLLER_STOP_SPEED: f64 = 16.0;

/// Grace period a roller may stay slow before detonating (seconds).
pub const ROLLER_STOP_GRACE_SECS: f64 = 1.1;

/// Horizontal speed of a burrowing charge (units/s).
pub const BURROW_SPEED: f64 = 150.0;

/// Depth beneath the surface a burrower travels at.
pub const BURROW_DEPTH: f64 = 14.0;

// --- Homing ---

/// Passive steering fraction granted by the Phantom archetype.
pub const PASSIVE_HOMING_STEER: f64 = 0.012;

// --- Beams ---

/// Ray-march step for hitscan beams.
pub const BEAM_STEP: f64 = 4.0;

/// Maximum march steps before a beam is abandoned.
pub const BEAM_MAX_STEPS: usize = 2000;

/// Radius of the ablation notch carved along a beam path.
pub const BEAM_ABLATE_RADIUS: f64 = 3.0;

// --- Pickups ---

/// Chance of an airdrop spawning at each turn boundary.
pub const AIRDROP_CHANCE: f64 = 0.15;

/// Fall speed of an airdropped crate (units/s).
pub const AIRDROP_FALL_SPEED: f64 = 120.0;

/// Maximum airborne lifetime of a crate before it is discarded (seconds).
pub const AIRDROP_MAX_FALL_SECS: f64 = 20.0;

/// Collection radius at the turn boundary.
pub const PICKUP_RADIUS: f64 = 60.0;

/// Shield strength granted by an Aegis pickup.
pub const SHIELD_STRENGTH: f64 = 50.0;

/// Hit points restored by a repair kit.
pub const REPAIR_KIT_HEAL: f64 = 35.0;

/// Damage multiplier added by a damage booster.
pub const DAMAGE_BOOST_BONUS: f64 = 0.5;

/// Blast radius added by a blast booster.
pub const BLAST_BOOST_BONUS: f64 = 15.0;

// --- Beacon strikes ---

/// Fall speed of a beacon-called strike (units/s).
pub const STRIKE_FALL_SPEED: f64 = 520.0;

/// Horizontal jitter applied to each beacon strike.
pub const STRIKE_JITTER: f64 = 18.0;

// --- Rewards ---

/// Currency granted per point of enemy damage.
pub const CURRENCY_PER_DAMAGE: f64 = 2.0;

/// Currency bonus for a kill (not awarded for self-kills).
pub const KILL_BONUS: f64 = 250.0;

// --- Completion gate ---

/// Real-time window after which a stuck resolution is force-cleared.
pub const WATCHDOG_SECS: f64 = 25.0;

// --- Terrain generation ---

/// Surface fades to the world bottom within this margin of either wall.
pub const EDGE_MARGIN: f64 = 150.0;

/// Columns within this radius of a spawn point are pulled level.
pub const SPAWN_FLATTEN_RADIUS: usize = 48;

/// Maximum height difference allowed between spawn platforms.
pub const SPAWN_BAND_MAX_DIFF: f64 = 90.0;

/// Control points per jagged sculpting call.
pub const JAGGED_POINTS: usize = 7;

// --- Trajectory solver ---

/// Coarse grid angle step (degrees).
pub const AIM_ANGLE_STEP_DEG: f64 = 2.0;

/// Coarse grid power steps between `AIM_MIN_POWER` and 1.0.
pub const AIM_POWER_STEPS: u32 = 10;

/// Lowest power fraction the solver considers.
pub const AIM_MIN_POWER: f64 = 0.25;

/// Refinement half-window around the best coarse angle (degrees).
pub const AIM_REFINE_ANGLE_DEG: f64 = 2.0;

/// Refinement angle step (degrees).
pub const AIM_REFINE_ANGLE_STEP_DEG: f64 = 0.5;

/// Refinement half-window around the best coarse power.
pub const AIM_REFINE_POWER: f64 = 0.08;

/// Refinement power step.
pub const AIM_REFINE_POWER_STEP: f64 = 0.02;

/// Maximum simulated flight time per candidate (seconds).
pub const AIM_SIM_MAX_SECS: f64 = 14.0;

/// Range at which beam accuracy has fully degraded.
pub const AIM_ACCURACY_FALLOFF_RANGE: f64 = 1400.0;

/// Floor on the beam commit probability.
pub const AIM_ACCURACY_MIN: f64 = 0.35;

/// Ceiling on the beam commit probability.
pub const AIM_ACCURACY_MAX: f64 = 0.95;

/// Maximum perturbation applied to a fumbled beam shot (degrees).
pub const AIM_BEAM_ERROR_DEG: f64 = 4.0;
