#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::rstest;

    use skirmish_core::constants::*;
    use skirmish_core::enums::{AgentState, EnemyArchetype};
    use skirmish_core::types::Position;
    use skirmish_nav::{NavGrid, NavigationProvider};

    use crate::fsm::{
        evaluate, initial_state, sight_range, AgentContext, Movement, WaypointOrder,
    };
    use crate::patrol::PatrolRoute;
    use crate::profiles::get_profile;

    fn make_context(state: AgentState, distance: f64, in_sight: bool) -> AgentContext {
        AgentContext {
            state,
            distance_to_player: distance,
            player_in_sight: in_sight,
            arrived: false,
            waiting: false,
            now: 10.0,
            next_fire_time: 0.0,
        }
    }

    // --- Transitions ---

    #[rstest]
    #[case::sighted_in_range(AgentState::Patrolling, 9.0, true, AgentState::Chasing)]
    #[case::sighted_at_range_edge(AgentState::Patrolling, 10.0, true, AgentState::Chasing)]
    #[case::in_range_but_blocked(AgentState::Patrolling, 5.0, false, AgentState::Patrolling)]
    #[case::sighted_too_far(AgentState::Patrolling, 10.5, true, AgentState::Patrolling)]
    #[case::close_enough_to_attack(AgentState::Chasing, 6.9, true, AgentState::Attacking)]
    #[case::exactly_attack_range(AgentState::Chasing, 7.0, true, AgentState::Chasing)]
    #[case::lost_beyond_patrol_range(AgentState::Chasing, 15.1, true, AgentState::Patrolling)]
    #[case::exactly_patrol_range(AgentState::Chasing, 15.0, false, AgentState::Chasing)]
    #[case::attack_holds(AgentState::Attacking, 7.5, true, AgentState::Attacking)]
    #[case::attack_blocked(AgentState::Attacking, 3.0, false, AgentState::Chasing)]
    #[case::attack_past_margin(AgentState::Attacking, 8.1, true, AgentState::Chasing)]
    fn test_grunt_transitions(
        #[case] state: AgentState,
        #[case] distance: f64,
        #[case] in_sight: bool,
        #[case] expected: AgentState,
    ) {
        let profile = get_profile(EnemyArchetype::Grunt);
        let update = evaluate(&make_context(state, distance, in_sight), &profile);
        assert_eq!(update.new_state, expected);
        assert_eq!(update.state_changed, state != expected);
    }

    #[rstest]
    #[case(EnemyArchetype::Grunt)]
    #[case(EnemyArchetype::Runner)]
    #[case(EnemyArchetype::Marksman)]
    fn test_chase_midpoint_does_not_oscillate(#[case] archetype: EnemyArchetype) {
        let profile = get_profile(archetype);
        assert!(profile.patrol_range > profile.chase_range);
        let midpoint = (profile.chase_range + profile.patrol_range) / 2.0;

        let mut ctx = make_context(AgentState::Chasing, midpoint, true);
        for _ in 0..100 {
            let update = evaluate(&ctx, &profile);
            assert_eq!(update.new_state, AgentState::Chasing);
            assert!(!update.state_changed);
            ctx.state = update.new_state;
        }
    }

    #[rstest]
    #[case(EnemyArchetype::Grunt)]
    #[case(EnemyArchetype::Runner)]
    #[case(EnemyArchetype::Marksman)]
    fn test_profile_ranges_are_ordered(#[case] archetype: EnemyArchetype) {
        let p = get_profile(archetype);
        assert!(p.attack_range < p.chase_range, "{archetype:?}");
        assert!(p.chase_range < p.patrol_range, "{archetype:?}");
        assert!(p.patrol_wait_secs.0 <= p.patrol_wait_secs.1);
        assert!(p.low_health_threshold < p.max_health);
        assert!(p.fire_interval_secs > 0.0);
    }

    // --- Orders ---

    #[test]
    fn test_patrol_sighting_cancels_wait() {
        let profile = get_profile(EnemyArchetype::Grunt);
        let mut ctx = make_context(AgentState::Patrolling, 5.0, true);
        ctx.waiting = true;
        let update = evaluate(&ctx, &profile);
        assert_eq!(update.new_state, AgentState::Chasing);
        assert_eq!(update.waypoint, WaypointOrder::CancelWait);
        assert!(!update.fire);
    }

    #[test]
    fn test_patrol_arrival_begins_wait_and_halts() {
        let profile = get_profile(EnemyArchetype::Grunt);
        let mut ctx = make_context(AgentState::Patrolling, 50.0, false);
        ctx.arrived = true;
        let update = evaluate(&ctx, &profile);
        assert_eq!(update.waypoint, WaypointOrder::BeginWait);
        assert_eq!(update.movement, Movement::Halt);

        // Already waiting: no second wait is scheduled.
        ctx.waiting = true;
        let update = evaluate(&ctx, &profile);
        assert_eq!(update.waypoint, WaypointOrder::None);
        assert_eq!(
            update.movement,
            Movement::Cruise {
                speed: profile.patrol_speed
            }
        );
    }

    #[test]
    fn test_chase_pursues_at_chase_speed() {
        let profile = get_profile(EnemyArchetype::Runner);
        let update = evaluate(&make_context(AgentState::Chasing, 9.0, true), &profile);
        assert_eq!(
            update.movement,
            Movement::Pursue {
                speed: profile.chase_speed
            }
        );
        assert!(!update.face_player);
    }

    #[test]
    fn test_chase_to_patrol_resumes_route() {
        let profile = get_profile(EnemyArchetype::Grunt);
        let update = evaluate(&make_context(AgentState::Chasing, 30.0, false), &profile);
        assert_eq!(update.new_state, AgentState::Patrolling);
        assert_eq!(update.waypoint, WaypointOrder::AdvanceNow);
    }

    #[test]
    fn test_attack_fires_on_cooldown() {
        let profile = get_profile(EnemyArchetype::Grunt);
        let mut ctx = make_context(AgentState::Attacking, 5.0, true);
        ctx.next_fire_time = 10.0;
        let update = evaluate(&ctx, &profile);
        assert!(update.fire, "now == next_fire_time should fire");
        assert!(update.face_player);
        assert_eq!(update.movement, Movement::Halt);

        ctx.next_fire_time = 10.5;
        let update = evaluate(&ctx, &profile);
        assert!(!update.fire);
        assert!(update.face_player);
    }

    #[test]
    fn test_attack_exit_does_not_fire() {
        let profile = get_profile(EnemyArchetype::Grunt);
        let update = evaluate(&make_context(AgentState::Attacking, 5.0, false), &profile);
        assert_eq!(update.new_state, AgentState::Chasing);
        assert!(!update.fire);
        assert!(!update.face_player);
    }

    #[test]
    fn test_initial_state_and_sight_ranges() {
        assert_eq!(initial_state(true), AgentState::Patrolling);
        assert_eq!(initial_state(false), AgentState::Chasing);

        let p = get_profile(EnemyArchetype::Grunt);
        assert_eq!(sight_range(AgentState::Patrolling, &p), Some(p.chase_range));
        assert_eq!(sight_range(AgentState::Chasing, &p), None);
        assert_eq!(
            sight_range(AgentState::Attacking, &p),
            Some(p.attack_range + ATTACK_EXIT_MARGIN)
        );
    }

    // --- Patrol route ---

    #[test]
    fn test_route_advance_wraps() {
        let a = Position::new(1.0, 0.0);
        let b = Position::new(2.0, 0.0);
        let mut route = PatrolRoute::from_waypoints(vec![a, b]);
        assert_eq!(route.advance(), Some(a));
        assert_eq!(route.advance(), Some(b));
        assert_eq!(route.advance(), Some(a));
        assert_eq!(route.next_index(), 1);

        let mut empty = PatrolRoute::default();
        assert!(empty.is_empty());
        assert_eq!(empty.advance(), None);
    }

    #[test]
    fn test_wait_fires_after_duration() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut route = PatrolRoute::from_waypoints(vec![Position::new(3.0, 3.0)]);
        route.begin_wait((2.0, 2.0), &mut rng);
        assert!(route.is_waiting());

        let mut fired = None;
        let mut ticks = 0;
        while fired.is_none() && ticks < 1000 {
            fired = route.tick_wait(DT);
            ticks += 1;
        }
        assert_eq!(fired, Some(Position::new(3.0, 3.0)));
        assert!(!route.is_waiting());
        assert!((ticks as f64 * DT - 2.0).abs() < 2.0 * DT, "fired after {ticks} ticks");
    }

    #[test]
    fn test_cancelled_wait_never_fires() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut route = PatrolRoute::from_waypoints(vec![Position::new(1.0, 1.0)]);
        route.begin_wait((0.5, 1.0), &mut rng);
        route.tick_wait(0.25);
        route.cancel_wait();
        for _ in 0..600 {
            assert_eq!(route.tick_wait(DT), None);
        }
        assert_eq!(route.next_index(), 0);
    }

    #[test]
    fn test_wait_duration_within_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..50 {
            let mut route = PatrolRoute::from_waypoints(vec![Position::default()]);
            route.begin_wait((2.0, 5.0), &mut rng);
            assert_eq!(route.tick_wait(1.99), None);
            let mut elapsed = 1.99;
            while route.tick_wait(0.01).is_none() {
                elapsed += 0.01;
                assert!(elapsed <= 5.0 + 1e-6, "wait overran the range");
            }
        }
    }

    #[test]
    fn test_generate_stays_walkable_and_near() {
        let grid = NavGrid::open(Position::new(-50.0, -50.0), 1.0, 100, 100);
        let origin = Position::new(0.0, 0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let route = PatrolRoute::generate(origin, 20.0, 5, &grid, &mut rng);
        assert_eq!(route.waypoints().len(), 5);
        for wp in route.waypoints() {
            assert!(wp.distance_to(&origin) <= 20.0 + 1e-9);
            assert!(grid.sample_position(wp, 0.0).is_some());
        }
    }

    #[test]
    fn test_generate_falls_back_to_origin() {
        // Nowhere to stand: every sample falls back to the spawn point.
        let grid = NavGrid::from_rows(Position::new(-2.0, -2.0), 1.0, &["####"; 4]).unwrap();
        let origin = Position::new(0.5, 0.5);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let route = PatrolRoute::generate(origin, 1.5, 3, &grid, &mut rng);
        assert!(route.waypoints().iter().all(|wp| *wp == origin));
    }

    #[test]
    fn test_generate_is_deterministic() {
        let grid = NavGrid::open(Position::new(-50.0, -50.0), 1.0, 100, 100);
        let origin = Position::new(3.0, -4.0);
        let a = PatrolRoute::generate(origin, 10.0, 5, &grid, &mut ChaCha8Rng::seed_from_u64(9));
        let b = PatrolRoute::generate(origin, 10.0, 5, &grid, &mut ChaCha8Rng::seed_from_u64(9));
        assert_eq!(a.waypoints(), b.waypoints());
    }
}
