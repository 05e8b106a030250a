//! Integration tests for NEURODRIVE

use neurodrive::config::{EvolutionConfig, SelectionEnd};
use neurodrive::evolution::{GeneticManager, Transition};
use neurodrive::neural::{NeuralNetwork, Topology};
use neurodrive::stats::StatsHistory;
use neurodrive::{Config, Simulation};

fn scenario_config() -> EvolutionConfig {
    EvolutionConfig {
        population_size: 4,
        mutation_rate: 0.0,
        best_agent_selection: 1,
        worst_agent_selection: 1,
        number_to_crossover: 1,
        best_end: SelectionEnd::HighEnd,
        worst_end: SelectionEnd::LowEnd,
        ..Default::default()
    }
}

#[test]
fn test_four_genome_generation() {
    let topology = Topology::new(1, 10);
    let mut manager = GeneticManager::new_with_seed(scenario_config(), topology, 12345).unwrap();
    let originals: Vec<NeuralNetwork> = manager.population().iter().cloned().collect();

    for (i, score) in [10.0, 40.0, 20.0].into_iter().enumerate() {
        assert!(manager.bind().same_parameters(&originals[i]));
        assert_eq!(manager.report(score), Transition::Advanced { genome: i + 1 });
    }
    assert!(manager.bind().same_parameters(&originals[3]));
    let transition = manager.report(5.0);
    assert!(matches!(transition, Transition::NewGeneration(_)));

    let population = manager.population();
    assert_eq!(population.len(), 4);
    assert_eq!(manager.current_generation(), 1);
    assert_eq!(manager.current_genome_index(), 0);

    // Elite copy of the fittest genome
    assert!(population[0].same_parameters(&originals[1]));
    assert_eq!(population[0].fitness, 0.0);

    // Crossover pair: every slot comes from one of the two parents
    let parents = [&originals[1], &originals[3]];
    for child in [&population[1], &population[2]] {
        for (i, w) in child.weights.iter().enumerate() {
            assert!(parents.iter().any(|p| &p.weights[i] == w));
        }
        for (i, b) in child.biases.iter().enumerate() {
            assert!(parents.iter().any(|p| &p.biases[i] == b));
        }
    }

    // Random fill
    assert!(originals.iter().all(|g| !g.same_parameters(&population[3])));

    // Bound genome after the boundary is the elite
    assert!(manager.bind().same_parameters(&originals[1]));
}

#[test]
fn test_shape_invariant_over_generations() {
    let config = EvolutionConfig {
        population_size: 12,
        mutation_rate: 0.5,
        best_agent_selection: 2,
        worst_agent_selection: 2,
        number_to_crossover: 4,
        ..Default::default()
    };

    for topology in [Topology::new(0, 1), Topology::new(2, 7), Topology::new(3, 16)] {
        let mut manager = GeneticManager::new_with_seed(config.clone(), topology, 99).unwrap();

        for generation in 0..5 {
            for i in 0..12 {
                let genome = manager.bind();
                assert!(genome.matches(topology));

                let (a, b) = genome.run_network(i as f32 * 0.3, 2.0, -1.0);
                assert!((-1.0..=1.0).contains(&a));
                assert!((-1.0..=1.0).contains(&b));

                manager.report((i * 7 % 11) as f32 + generation as f32);
            }
            assert_eq!(manager.population().len(), 12);
        }
    }
}

#[test]
fn test_cursor_monotonicity() {
    let config = EvolutionConfig {
        population_size: 5,
        best_agent_selection: 1,
        worst_agent_selection: 1,
        number_to_crossover: 2,
        ..Default::default()
    };
    let mut manager = GeneticManager::new_with_seed(config, Topology::default(), 3).unwrap();

    let mut last_index = manager.current_genome_index();
    let mut last_generation = manager.current_generation();

    for step in 0..23 {
        manager.report(step as f32);
        let index = manager.current_genome_index();
        let generation = manager.current_generation();

        if generation == last_generation {
            assert!(index > last_index);
        } else {
            assert_eq!(generation, last_generation + 1);
            assert_eq!(index, 0);
        }

        last_index = index;
        last_generation = generation;
    }

    assert_eq!(manager.current_generation(), 4);
    assert_eq!(manager.current_genome_index(), 3);
}

#[test]
fn test_reproducible_simulation() {
    let mut config = Config::default();
    config.evolution.population_size = 8;
    config.evolution.best_agent_selection = 2;
    config.evolution.worst_agent_selection = 1;
    config.evolution.number_to_crossover = 2;

    let mut sim1 = Simulation::new_with_seed(&config, 2024).unwrap();
    let mut sim2 = Simulation::new_with_seed(&config, 2024).unwrap();

    let stats1 = sim1.run_generations(3);
    let stats2 = sim2.run_generations(3);

    assert_eq!(stats1, stats2);
    assert_eq!(sim1.ticks, sim2.ticks);
    for (a, b) in sim1.manager.population().iter().zip(sim2.manager.population()) {
        assert!(a.same_parameters(b));
    }
}

#[test]
fn test_stats_history_export() {
    let mut config = Config::default();
    config.evolution.population_size = 6;
    config.evolution.best_agent_selection = 1;
    config.evolution.worst_agent_selection = 1;
    config.evolution.number_to_crossover = 2;

    let mut sim = Simulation::new_with_seed(&config, 777).unwrap();
    sim.run_generations(2);

    let history = sim.manager.history();
    assert_eq!(history.snapshots.len(), 2);
    assert!(history.best_ever().unwrap() > 0.0);

    let temp_path = std::env::temp_dir().join("neurodrive_test_history.json");
    history.save(&temp_path).expect("Failed to save history");
    let loaded = StatsHistory::load(&temp_path).expect("Failed to load history");
    assert_eq!(loaded.snapshots, history.snapshots);

    std::fs::remove_file(&temp_path).ok();
}

#[test]
fn test_config_file_drives_simulation() {
    let temp_path = std::env::temp_dir().join("neurodrive_test_run_config.yaml");
    let mut config = Config::default();
    config.evolution.population_size = 5;
    config.evolution.best_agent_selection = 1;
    config.evolution.worst_agent_selection = 1;
    config.evolution.number_to_crossover = 1;
    config.network.layers = 2;
    config.network.neurons = 4;
    config.save(&temp_path).unwrap();

    let loaded = Config::from_file(&temp_path).unwrap();
    let mut sim = Simulation::new_with_seed(&loaded, 5).unwrap();
    let stats = sim.run_generation();

    assert_eq!(stats.random_fill, 2);
    assert!(sim.manager.bind().matches(Topology::new(2, 4)));

    std::fs::remove_file(&temp_path).ok();
}
