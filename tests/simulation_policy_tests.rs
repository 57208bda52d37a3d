use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uct_mcts::{
    game_state::{Action, Player},
    policy::simulation::{RandomPolicy, SimulationPolicy, UniformPolicy},
    GameState, MCTSError,
};

/// Walk along a line of 10 cells, one or two cells at a time
#[derive(Clone, Debug)]
struct TestGameState {
    position: u8,
    rollout: Rollout,
}

/// How the state's default policy behaves
#[derive(Clone, Copy, Debug, PartialEq)]
enum Rollout {
    /// Uniform random (the trait's default behavior)
    Random,
    /// Always take the long step
    Greedy,
    /// Broken heuristic that never proposes a move
    Stuck,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct TestPlayer(u8);

impl Player for TestPlayer {}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Step(u8);

impl Action for Step {
    fn id(&self) -> usize {
        self.0 as usize
    }
}

impl GameState for TestGameState {
    type Action = Step;
    type Player = TestPlayer;
    type Reward = f64;

    fn get_legal_actions(&self) -> Vec<Self::Action> {
        if self.is_terminal() {
            vec![]
        } else {
            vec![Step(1), Step(2)]
        }
    }

    fn apply_action(&self, action: &Self::Action) -> Self {
        TestGameState {
            position: self.position + action.0,
            rollout: self.rollout,
        }
    }

    fn is_terminal(&self) -> bool {
        self.position >= 10
    }

    fn get_result(&self, _for_player: &Self::Player) -> f64 {
        f64::from(self.position) / 10.0
    }

    fn get_current_player(&self) -> Self::Player {
        TestPlayer(1)
    }

    fn default_policy<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Self::Action> {
        match self.rollout {
            Rollout::Random => {
                if self.is_terminal() {
                    None
                } else {
                    Some(Step(rng.gen_range(1..=2)))
                }
            }
            Rollout::Greedy => Some(Step(2)),
            Rollout::Stuck => None,
        }
    }
}

fn start(rollout: Rollout) -> TestGameState {
    TestGameState {
        position: 0,
        rollout,
    }
}

#[test]
fn test_random_policy_reaches_terminal() {
    let state = start(Rollout::Random);
    let mut rng = StdRng::seed_from_u64(11);

    let playout = RandomPolicy::new().simulate(&state, None, &mut rng).unwrap();

    assert!(playout.state.is_terminal());
    assert!(playout.steps >= 5 && playout.steps <= 10);
    // The rollout works on a copy
    assert_eq!(state.position, 0);
}

#[test]
fn test_terminal_state_plays_no_moves() {
    let state = TestGameState {
        position: 10,
        rollout: Rollout::Random,
    };
    let mut rng = StdRng::seed_from_u64(0);

    let playout = RandomPolicy::new().simulate(&state, None, &mut rng).unwrap();
    assert_eq!(playout.steps, 0);
    assert_eq!(playout.state.position, 10);
    assert_eq!(playout.state.get_result(&TestPlayer(1)), 1.0);
}

#[test]
fn test_max_steps_cuts_rollout_short() {
    let state = start(Rollout::Random);
    let mut rng = StdRng::seed_from_u64(5);

    let playout = UniformPolicy::new()
        .simulate(&state, Some(3), &mut rng)
        .unwrap();

    assert_eq!(playout.steps, 3);
    assert!(!playout.state.is_terminal());
    // The cut-off state is still evaluated by get_result
    assert!(playout.state.get_result(&TestPlayer(1)) < 1.0);
}

#[test]
fn test_random_policy_uses_default_policy() {
    let state = start(Rollout::Greedy);
    let mut rng = StdRng::seed_from_u64(1);

    let playout = RandomPolicy::new().simulate(&state, None, &mut rng).unwrap();

    assert_eq!(
        playout.steps, 5,
        "Greedy default policy should always take the long step"
    );
    assert_eq!(playout.state.position, 10);
}

#[test]
fn test_uniform_policy_ignores_default_policy() {
    let state = start(Rollout::Greedy);
    let policy = UniformPolicy::new();

    let lengths: Vec<usize> = (0..20)
        .map(|seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            policy.simulate(&state, None, &mut rng).unwrap().steps
        })
        .collect();

    assert!(
        lengths.iter().any(|&steps| steps != 5),
        "Uniform rollouts should sometimes take short steps: {:?}",
        lengths
    );
}

#[test]
fn test_missing_move_is_contract_violation() {
    let state = start(Rollout::Stuck);
    let mut rng = StdRng::seed_from_u64(0);

    let result = RandomPolicy::new().simulate(&state, None, &mut rng);
    assert!(matches!(
        result,
        Err(MCTSError::DomainContractViolation(_))
    ));

    // The uniform policy never asks the default policy
    let playout = UniformPolicy::new().simulate(&state, None, &mut rng).unwrap();
    assert!(playout.state.is_terminal());
}

#[test]
fn test_same_seed_same_playout() {
    let state = start(Rollout::Random);
    let policy = RandomPolicy::new();

    let mut rng_a = StdRng::seed_from_u64(99);
    let mut rng_b = StdRng::seed_from_u64(99);
    let a = policy.simulate(&state, None, &mut rng_a).unwrap();
    let b = policy.simulate(&state, None, &mut rng_b).unwrap();

    assert_eq!(a.steps, b.steps);
    assert_eq!(a.state.position, b.state.position);
}

#[test]
fn test_simulation_policy_cloning() {
    let boxed: Box<dyn SimulationPolicy<TestGameState>> = Box::new(RandomPolicy::new());
    let cloned = boxed.clone_box();

    let state = start(Rollout::Greedy);
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(cloned.simulate(&state, None, &mut rng).unwrap().steps, 5);
}
