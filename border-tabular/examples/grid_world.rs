use anyhow::Result;
use border_tabular::{LoadOutcome, QLearn, QLearnConfig};
use clap::Parser;
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;

const WIDTH: i32 = 5;
const HEIGHT: i32 = 5;
const GOAL: (i32, i32) = (4, 4);
const PIT: (i32, i32) = (2, 2);
const MAX_STEPS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
        };
        write!(f, "{}", s)
    }
}

/// Deterministic grid with a goal and a pit, both terminal.
struct GridWorld {
    pos: (i32, i32),
}

impl GridWorld {
    fn new() -> Self {
        Self { pos: (0, 0) }
    }

    fn reset(&mut self) -> (i32, i32) {
        self.pos = (0, 0);
        self.pos
    }

    /// Returns the next state, the reward and whether the episode ended.
    fn step(&mut self, m: Move) -> ((i32, i32), f64, bool) {
        let (x, y) = self.pos;
        let (x, y) = match m {
            Move::Up => (x, y - 1),
            Move::Down => (x, y + 1),
            Move::Left => (x - 1, y),
            Move::Right => (x + 1, y),
        };
        self.pos = (x.clamp(0, WIDTH - 1), y.clamp(0, HEIGHT - 1));

        if self.pos == GOAL {
            (self.pos, 10.0, true)
        } else if self.pos == PIT {
            (self.pos, -10.0, true)
        } else {
            (self.pos, -0.1, false)
        }
    }
}

/// Train a tabular Q-learning agent on a 5x5 grid world.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Number of training episodes.
    #[arg(long, default_value_t = 500)]
    episodes: usize,

    /// Logical name of the saved table (`<name>.bin` and `<name>.csv`).
    #[arg(long, default_value = "./border-tabular/examples/model/grid_world")]
    model: String,

    /// Continue from the table saved under `--model`.
    #[arg(long, default_value_t = false)]
    resume: bool,

    /// Random seed of the agent.
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn create_agent(seed: u64) -> Result<QLearn<(i32, i32), Move>> {
    let config = QLearnConfig::default()
        .epsilon(0.2)
        .alpha(0.5)
        .gamma(0.95)
        .seed(seed);
    Ok(QLearn::build(
        config,
        vec![Move::Up, Move::Down, Move::Left, Move::Right],
    )?)
}

/// Runs episodes and returns the return of each one.
fn train(agent: &mut QLearn<(i32, i32), Move>, n_episodes: usize) -> Vec<f64> {
    let mut env = GridWorld::new();
    let mut returns = Vec::with_capacity(n_episodes);

    for episode in 0..n_episodes {
        let mut state = env.reset();
        let mut ret = 0.0;
        for _ in 0..MAX_STEPS {
            let action = agent.select_action(&state);
            let (next, reward, done) = env.step(action);
            agent.update(&state, &action, reward, &next);
            ret += reward;
            state = next;
            if done {
                break;
            }
        }
        if (episode + 1) % 100 == 0 {
            info!("episode = {}, return = {:.2}", episode + 1, ret);
        }
        returns.push(ret);
    }

    returns
}

/// Follows the greedy policy from the start and returns the visited states.
fn greedy_path(agent: &mut QLearn<(i32, i32), Move>) -> Result<Vec<(i32, i32)>> {
    let eps = agent.epsilon();
    agent.set_epsilon(0.0)?;
    let mut env = GridWorld::new();
    let mut state = env.reset();
    let mut path = vec![state];
    for _ in 0..MAX_STEPS {
        let (next, _, done) = env.step(agent.select_action(&state));
        path.push(next);
        state = next;
        if done {
            break;
        }
    }
    agent.set_epsilon(eps)?;
    Ok(path)
}

fn run(args: &Args) -> Result<Vec<(i32, i32)>> {
    let mut agent = create_agent(args.seed)?;
    if args.resume {
        if let LoadOutcome::NotFound { path } = agent.load_table(&args.model)? {
            info!("{} not found, start from an empty table", path.display());
        }
    }

    train(&mut agent, args.episodes);
    if let Some(dir) = std::path::Path::new(&args.model).parent() {
        std::fs::create_dir_all(dir)?;
    }
    agent.save_table(&args.model)?;

    let path = greedy_path(&mut agent)?;
    info!("greedy path: {:?}", path);
    Ok(path)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    run(&args)?;
    Ok(())
}
