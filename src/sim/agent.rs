//! Car agent: senses the track, drives with the bound genome and scores
//! its own episode.

use super::track::{Track, Vec2};
use crate::config::AgentConfig;
use crate::neural::NeuralNetwork;

/// Sensor directions relative to heading: right, forward, left
const SENSOR_ANGLES: [f32; 3] = [-45.0, 0.0, 45.0];

/// Why an episode ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EpisodeEnd {
    /// Left the lane
    Collision,
    /// Still below the minimum fitness after the grace period
    Stalled,
    /// Reached the maximum fitness
    Solved,
    /// Hit the episode time cap
    Timeout,
}

/// One car driven by whichever genome is currently bound
#[derive(Clone, Debug)]
pub struct CarAgent {
    config: AgentConfig,

    start_position: Vec2,
    start_heading: f32,

    pub position: Vec2,
    /// Degrees, counter-clockwise from +x
    pub heading: f32,
    pub time_since_start: f32,
    pub total_distance: f32,
    pub avg_speed: f32,
    /// Last readings: right, forward, left
    pub sensors: [f32; 3],
    /// Last network outputs: throttle, steering
    pub controls: (f32, f32),
    pub overall_fitness: f32,
}

impl CarAgent {
    /// Place a new agent at the track's start pose
    pub fn new(config: AgentConfig, track: &Track) -> Self {
        let (start_position, start_heading) = track.start_pose();
        Self {
            config,
            start_position,
            start_heading,
            position: start_position,
            heading: start_heading,
            time_since_start: 0.0,
            total_distance: 0.0,
            avg_speed: 0.0,
            sensors: [0.0; 3],
            controls: (0.0, 0.0),
            overall_fitness: 0.0,
        }
    }

    /// Return to the start pose with all episode counters cleared
    pub fn reset(&mut self) {
        self.position = self.start_position;
        self.heading = self.start_heading;
        self.time_since_start = 0.0;
        self.total_distance = 0.0;
        self.avg_speed = 0.0;
        self.sensors = [0.0; 3];
        self.controls = (0.0, 0.0);
        self.overall_fitness = 0.0;
    }

    /// Advance one tick. Returns the reason if the episode ended.
    pub fn step(&mut self, genome: &NeuralNetwork, track: &Track) -> Option<EpisodeEnd> {
        self.sense(track);
        let last_position = self.position;

        let [a, b, c] = self.sensors;
        self.controls = genome.run_network(a, b, c);
        self.drive(self.controls.0, self.controls.1);
        self.time_since_start += self.config.timestep;

        self.total_distance += self.position.distance(last_position);
        self.update_fitness();

        if !track.contains(self.position) {
            return Some(EpisodeEnd::Collision);
        }
        self.check_termination()
    }

    /// Score of the current episode so far
    #[inline]
    pub fn fitness(&self) -> f32 {
        self.overall_fitness
    }

    /// Read the three range sensors. A ray that hits nothing keeps its last value.
    pub fn sense(&mut self, track: &Track) {
        for (reading, offset) in self.sensors.iter_mut().zip(SENSOR_ANGLES) {
            let direction = Vec2::from_heading(self.heading + offset);
            if let Some(distance) = track.raycast(self.position, direction) {
                *reading = distance / self.config.sensor_scale;
            }
        }
    }

    /// Move forward by the throttle and rotate by the steering
    pub fn drive(&mut self, throttle: f32, steering: f32) {
        let speed = throttle * self.config.speed_scale * self.config.lerp;
        self.position += Vec2::from_heading(self.heading) * speed;
        self.heading += steering * self.config.turn_rate * self.config.lerp;
    }

    fn update_fitness(&mut self) {
        let cfg = &self.config;
        self.avg_speed = if self.time_since_start > 0.0 {
            self.total_distance / self.time_since_start
        } else {
            0.0
        };

        let sensor_mean = self.sensors.iter().sum::<f32>() / self.sensors.len() as f32;
        self.overall_fitness = self.total_distance * cfg.distance_multiplier
            + self.avg_speed * cfg.avg_speed_multiplier
            + sensor_mean * cfg.sensor_multiplier;
    }

    fn check_termination(&self) -> Option<EpisodeEnd> {
        let cfg = &self.config;
        if self.time_since_start > cfg.grace_period && self.overall_fitness < cfg.min_fitness {
            Some(EpisodeEnd::Stalled)
        } else if self.overall_fitness >= cfg.max_fitness {
            Some(EpisodeEnd::Solved)
        } else if self.time_since_start >= cfg.max_episode_time {
            Some(EpisodeEnd::Timeout)
        } else {
            None
        }
    }
}
