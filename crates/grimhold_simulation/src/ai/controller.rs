//! Hostile agent controller — один тик поведения
//!
//! Порядок внутри тика фиксирован:
//! 1. Таймеры (attack cooldown, action gate)
//! 2. Dead → no-op
//! 3. Walking signal из displacement прошлого тика (каждый живой тик)
//! 4. Flee (health ≤ threshold) → "isRunning", команда только к exit точке
//! 5. Gate не истёк → пауза
//! 6. Overlap запросы → state → команда → gate заново
//!
//! Capabilities приходят снаружи (WorldQueries, Pathing, AnimationSink),
//! поэтому контроллер тестируется без ECS и без Rapier.

use bevy::prelude::*;
use rand::Rng;

use super::components::{AgentConfig, AgentState, AttackKind, HostileAgent};
use super::decision::{self, AgentCommand, DecisionContext, Perception, TickPhase};
use crate::physics::{yaw_rotation, Pathing};
use crate::shared::{agent_params, AnimationSink, WorldQueries};

/// Входы тика от host loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentTickContext {
    pub position: Vec3,
    pub player_position: Vec3,
    /// Горизонтальное смещение прошлого тика (motion signal)
    pub moved_last_tick: bool,
    pub delta: f32,
}

/// Что произошло в тике (для систем, логов, тестов)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AgentTickOutcome {
    /// Новый поворот тела (Attack смотрит на игрока)
    pub facing: Option<Quat>,
    pub attack: Option<AttackKind>,
    /// Было ли принято решение (gate перезапущен)
    pub decided: bool,
}

impl HostileAgent {
    /// TakeDamage: true если именно этот удар убил агента
    pub fn take_damage(&mut self, amount: f32, animation: &mut dyn AnimationSink) -> bool {
        if self.is_dead {
            return false;
        }

        self.health -= amount;

        if self.health <= 0.0 {
            self.is_dead = true;
            animation.set_bool(agent_params::DIE, true);
            return true;
        }

        false
    }

    /// Принудительная смерть (скрипт уровня, kill volume)
    pub fn kill(&mut self, animation: &mut dyn AnimationSink) {
        if !self.is_dead {
            self.is_dead = true;
            animation.set_bool(agent_params::DIE, true);
        }
    }

    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        config: &AgentConfig,
        ctx: AgentTickContext,
        world: &dyn WorldQueries,
        pathing: &mut dyn Pathing,
        animation: &mut dyn AnimationSink,
        rng: &mut R,
    ) -> AgentTickOutcome {
        let mut outcome = AgentTickOutcome::default();

        self.attack_cooldown.tick(ctx.delta);
        self.action_gate.tick(ctx.delta);

        let phase = decision::classify(
            self.is_dead,
            self.is_fleeing(),
            self.health,
            config.flee_health_threshold,
            self.action_gate.is_ready(),
        );

        if phase == TickPhase::Dead {
            return outcome;
        }

        // Motion signal пересчитываем до новой команды
        animation.set_bool(agent_params::IS_WALKING, ctx.moved_last_tick);

        match phase {
            TickPhase::Flee => {
                self.flee(pathing, animation);
                return outcome;
            }
            TickPhase::Paused => return outcome,
            TickPhase::Dead | TickPhase::Decide => {}
        }

        let perception = Perception {
            player_in_sight: world.overlap_sphere(ctx.position, config.sight_range, config.player_mask),
            player_in_attack: world.overlap_sphere(ctx.position, config.attack_range, config.player_mask),
        };
        self.player_in_sight = perception.player_in_sight;
        self.player_in_attack = perception.player_in_attack;

        let Some(next_state) = decision::select_state(perception) else {
            return outcome;
        };

        if next_state == AgentState::Patrol && self.walk_target.is_none() {
            self.walk_target = self.search_walk_point(config, ctx.position, world, rng);
        }

        let decision = decision::decide(
            next_state,
            DecisionContext {
                position: ctx.position,
                player_position: ctx.player_position,
                walk_target: self.walk_target,
                attack_ready: self.attack_cooldown.is_ready(),
                arrival_distance: config.arrival_distance,
            },
        );

        if decision.state != self.state {
            crate::log(&format!("AI: {:?} → {:?}", self.state, decision.state));
        }
        self.state = decision.state;
        self.walk_target = decision.walk_target;

        match decision.command {
            AgentCommand::Keep => {}
            AgentCommand::MoveTo(point) => pathing.move_to(point),
            AgentCommand::Hold { face } => {
                pathing.stop();
                outcome.facing = yaw_rotation(face);
            }
        }

        if decision.fire_attack {
            let attack = AttackKind::random(rng);
            animation.set_trigger(attack.trigger());
            self.attack_cooldown.start();
            outcome.attack = Some(attack);
        }

        self.action_gate.start();
        outcome.decided = true;

        outcome
    }

    /// Вход во Flee не отдаёт pathing команд: прежняя цель (если была)
    /// доигрывается, новая команда только к exit точке.
    fn flee(&mut self, pathing: &mut dyn Pathing, animation: &mut dyn AnimationSink) {
        if !self.is_fleeing() {
            crate::log(&format!(
                "AI: {:?} → Flee (health {} ≤ threshold)",
                self.state, self.health
            ));
            self.state = AgentState::Flee;
            self.walk_target = None;
        }

        animation.set_bool(agent_params::IS_RUNNING, true);

        // Куда бежать решает уровень; без exit точки стоим
        if let Some(exit) = self.flee_exit {
            if pathing.destination() != Some(exit) {
                pathing.move_to(exit);
            }
        }
    }

    /// Случайная точка в квадрате ±walk_point_range вокруг агента
    ///
    /// Принимается только если ground check нашёл под ней пол.
    /// Отклонённая точка не перевыбирается в этом же тике.
    fn search_walk_point<R: Rng + ?Sized>(
        &self,
        config: &AgentConfig,
        position: Vec3,
        world: &dyn WorldQueries,
        rng: &mut R,
    ) -> Option<Vec3> {
        let range = config.walk_point_range;
        let offset_x = rng.gen_range(-range..=range);
        let offset_z = rng.gen_range(-range..=range);

        let candidate = Vec3::new(position.x + offset_x, position.y, position.z + offset_z);

        if world.has_ground_below(candidate, config.ground_mask, config.ground_check_distance) {
            Some(candidate)
        } else {
            crate::log(&format!("AI: patrol point {:?} rejected (no ground)", candidate));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::PathingAgent;
    use crate::shared::AnimationParams;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Мир из двух флагов: где игрок и есть ли пол
    struct StubWorld {
        player_distance: f32,
        ground: bool,
    }

    impl WorldQueries for StubWorld {
        fn overlap_sphere(&self, _origin: Vec3, radius: f32, _mask: u32) -> bool {
            self.player_distance <= radius
        }

        fn has_ground_below(&self, _point: Vec3, _mask: u32, _max_distance: f32) -> bool {
            self.ground
        }
    }

    struct Harness {
        agent: HostileAgent,
        config: AgentConfig,
        pathing: PathingAgent,
        animation: AnimationParams,
        rng: ChaCha8Rng,
    }

    impl Harness {
        fn new(config: AgentConfig) -> Self {
            Self {
                agent: HostileAgent::new(100.0, &config),
                config,
                pathing: PathingAgent::default(),
                animation: AnimationParams::default(),
                rng: ChaCha8Rng::seed_from_u64(42),
            }
        }

        fn tick(&mut self, world: &StubWorld, delta: f32) -> AgentTickOutcome {
            self.tick_moving(world, delta, false)
        }

        fn tick_moving(&mut self, world: &StubWorld, delta: f32, moved: bool) -> AgentTickOutcome {
            let ctx = AgentTickContext {
                position: Vec3::ZERO,
                player_position: Vec3::new(world.player_distance, 0.0, 0.0),
                moved_last_tick: moved,
                delta,
            };
            self.agent.tick(
                &self.config,
                ctx,
                world,
                &mut self.pathing,
                &mut self.animation,
                &mut self.rng,
            )
        }
    }

    fn no_pause() -> AgentConfig {
        AgentConfig {
            pause_time: 0.0,
            ..default()
        }
    }

    #[test]
    fn test_chase_scenario_no_attack() {
        // sight 10, attack 2, игрок на 5m
        let mut harness = Harness::new(AgentConfig::default());
        let world = StubWorld {
            player_distance: 5.0,
            ground: true,
        };

        let outcome = harness.tick(&world, 1.0 / 60.0);

        assert_eq!(harness.agent.state, AgentState::Chase);
        assert!(outcome.attack.is_none());
        assert!(harness.animation.pending_triggers().is_empty());
        assert_eq!(harness.pathing.destination(), Some(Vec3::new(5.0, 0.0, 0.0)));
    }

    #[test]
    fn test_flee_overrides_ranges() {
        let config = AgentConfig {
            flee_health_threshold: 1000.0,
            ..default()
        };
        let mut harness = Harness::new(config);
        harness.agent.health = 50.0;

        // Игрок в attack range — всё равно Flee
        let world = StubWorld {
            player_distance: 1.0,
            ground: true,
        };

        for _ in 0..10 {
            let outcome = harness.tick(&world, 0.5);
            assert_eq!(harness.agent.state, AgentState::Flee);
            assert!(outcome.attack.is_none());
        }

        assert!(harness.animation.get_bool(agent_params::IS_RUNNING));
        assert!(harness.pathing.destination().is_none());
    }

    #[test]
    fn test_flee_moves_to_exit_once_supplied() {
        let config = AgentConfig {
            flee_health_threshold: 1000.0,
            ..default()
        };
        let mut harness = Harness::new(config);
        let world = StubWorld {
            player_distance: 50.0,
            ground: true,
        };

        harness.tick(&world, 0.1);
        assert!(harness.pathing.destination().is_none());

        let exit = Vec3::new(30.0, 0.0, -4.0);
        harness.agent.set_flee_exit(exit);
        harness.tick(&world, 0.1);
        assert_eq!(harness.pathing.destination(), Some(exit));
    }

    #[test]
    fn test_attack_needs_both_ranges() {
        // attack_range > sight_range: attack-only геометрия
        let config = AgentConfig {
            sight_range: 2.0,
            attack_range: 5.0,
            pause_time: 0.0,
            ..default()
        };
        let mut harness = Harness::new(config);
        let world = StubWorld {
            player_distance: 3.0,
            ground: true,
        };

        for _ in 0..20 {
            let outcome = harness.tick(&world, 0.1);
            assert!(outcome.attack.is_none());
            assert!(!outcome.decided);
        }
        assert!(harness.animation.pending_triggers().is_empty());
    }

    #[test]
    fn test_attack_respects_cooldown() {
        let mut harness = Harness::new(AgentConfig {
            time_between_attacks: 1.0,
            ..no_pause()
        });
        let world = StubWorld {
            player_distance: 1.0,
            ground: true,
        };

        let first = harness.tick(&world, 0.1);
        assert!(first.attack.is_some());
        assert!(first.facing.is_some());
        assert_eq!(harness.agent.state, AgentState::Attack);

        // 9 тиков по 0.1s — ещё на cooldown
        for _ in 0..9 {
            assert!(harness.tick(&world, 0.1).attack.is_none());
        }

        // Суммарно ≥ 1.0s — следующая атака (с запасом на float накопление)
        let mut fired = false;
        for _ in 0..2 {
            fired |= harness.tick(&world, 0.1).attack.is_some();
        }
        assert!(fired);
        assert_eq!(harness.animation.pending_triggers().len(), 2);
    }

    #[test]
    fn test_action_gate_pauses_decisions() {
        let mut harness = Harness::new(AgentConfig {
            pause_time: 3.0,
            ..default()
        });
        let far = StubWorld {
            player_distance: 50.0,
            ground: true,
        };
        let near = StubWorld {
            player_distance: 5.0,
            ground: true,
        };

        assert!(harness.tick(&far, 0.5).decided);
        assert_eq!(harness.agent.state, AgentState::Patrol);

        // Игрок подошёл, но агент на паузе 3s
        for _ in 0..5 {
            assert!(!harness.tick(&near, 0.5).decided);
            assert_eq!(harness.agent.state, AgentState::Patrol);
        }

        assert!(harness.tick(&near, 0.5).decided);
        assert_eq!(harness.agent.state, AgentState::Chase);
    }

    #[test]
    fn test_patrol_rejected_point_waits_for_next_decision() {
        let mut harness = Harness::new(no_pause());
        let no_ground = StubWorld {
            player_distance: 50.0,
            ground: false,
        };

        harness.tick(&no_ground, 0.1);
        assert!(harness.agent.walk_target.is_none());
        assert!(harness.pathing.destination().is_none());

        let ground = StubWorld {
            player_distance: 50.0,
            ground: true,
        };
        harness.tick(&ground, 0.1);

        let target = harness.pathing.destination().expect("patrol point accepted");
        assert!(target.x.abs() <= 10.0 && target.z.abs() <= 10.0);
        // Либо ещё идём к ней, либо она оказалась ближе arrival_distance
        assert!(harness.agent.walk_target == Some(target) || harness.agent.walk_target.is_none());
    }

    #[test]
    fn test_take_damage_kills_once() {
        let mut agent = HostileAgent::new(30.0, &AgentConfig::default());
        let mut animation = AnimationParams::default();

        assert!(!agent.take_damage(10.0, &mut animation));
        assert!(!animation.get_bool(agent_params::DIE));

        assert!(agent.take_damage(25.0, &mut animation));
        assert!(agent.is_dead);
        assert_eq!(agent.health, -5.0); // Без clamp
        assert!(animation.get_bool(agent_params::DIE));

        // Мёртвый агент урон не принимает
        assert!(!agent.take_damage(10.0, &mut animation));
        assert_eq!(agent.health, -5.0);
    }

    #[test]
    fn test_dead_agent_is_noop() {
        let mut harness = Harness::new(no_pause());
        harness.agent.kill(&mut harness.animation);

        let world = StubWorld {
            player_distance: 1.0,
            ground: true,
        };
        let outcome = harness.tick(&world, 0.1);

        assert_eq!(outcome, AgentTickOutcome::default());
        assert!(harness.pathing.destination().is_none());
        assert!(harness.animation.get_bool(agent_params::DIE));
    }

    #[test]
    fn test_flee_entry_keeps_previous_destination() {
        let mut harness = Harness::new(AgentConfig::default());
        let world = StubWorld {
            player_distance: 5.0,
            ground: true,
        };

        harness.tick(&world, 1.0 / 60.0);
        let chase_point = harness.pathing.destination();
        assert_eq!(chase_point, Some(Vec3::new(5.0, 0.0, 0.0)));

        // Урон до порога: Flee, но pathing команд нет
        harness.agent.health = 10.0;
        harness.tick(&world, 1.0 / 60.0);

        assert_eq!(harness.agent.state, AgentState::Flee);
        assert_eq!(harness.pathing.destination(), chase_point);
        assert!(harness.animation.get_bool(agent_params::IS_RUNNING));
    }

    #[test]
    fn test_walking_signal_refreshes_while_fleeing() {
        let config = AgentConfig {
            flee_health_threshold: 1000.0,
            ..default()
        };
        let mut harness = Harness::new(config);
        let world = StubWorld {
            player_distance: 50.0,
            ground: true,
        };

        harness.tick_moving(&world, 0.1, true);
        assert_eq!(harness.agent.state, AgentState::Flee);
        assert!(harness.animation.get_bool(agent_params::IS_WALKING));

        harness.tick_moving(&world, 0.1, false);
        assert!(!harness.animation.get_bool(agent_params::IS_WALKING));
        assert!(harness.animation.get_bool(agent_params::IS_RUNNING));
    }

    #[test]
    fn test_dead_agent_keeps_walking_signal() {
        let mut harness = Harness::new(no_pause());
        harness.tick_moving(
            &StubWorld {
                player_distance: 50.0,
                ground: true,
            },
            0.1,
            true,
        );
        assert!(harness.animation.get_bool(agent_params::IS_WALKING));

        harness.agent.kill(&mut harness.animation);
        harness.tick_moving(
            &StubWorld {
                player_distance: 50.0,
                ground: true,
            },
            0.1,
            false,
        );

        // Мёртвый тик ничего не пишет в animator
        assert!(harness.animation.get_bool(agent_params::IS_WALKING));
    }
}
