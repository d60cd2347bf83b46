use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use gridworld_rl_agent::ValueIterationAgent;
use gridworld_rl_core::{AgentConfig, Position, RewardConfig};
use gridworld_rl_env::{generate_goal_layout, generate_obstacles, GridTopology, GridWorld};

fn world(size: i32, goals: usize) -> GridWorld {
    let mut rng = StdRng::seed_from_u64(17);
    let start = Position::new(1, 1);
    let obstacles = generate_obstacles(size, (size as usize) / 2, start, &mut rng).unwrap();
    let layout = generate_goal_layout(size, goals, &obstacles, start, &mut rng).unwrap();
    let topology = GridTopology::new(size, obstacles).unwrap();
    GridWorld::from_parts(topology, layout, start, 0.8, RewardConfig::harsh_stuck()).unwrap()
}

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("value_iteration");
    for (size, goals) in [(4, 1), (6, 3), (8, 5)] {
        let env = world(size, goals);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{size}x{size}_{goals}goals")),
            &env,
            |b, env| {
                b.iter(|| {
                    let mut agent = ValueIterationAgent::new(env, &AgentConfig::default()).unwrap();
                    black_box(agent.solve().unwrap())
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_solve);
criterion_main!(benches);
