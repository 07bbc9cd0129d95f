//! Planner configuration.

/// Cost-model and geometry parameters for journey planning.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Assumed average vehicle speed for ride edge weights (km/h).
    pub ride_speed_kmh: f64,

    /// Assumed walking speed for walking segment durations (km/h).
    pub walking_speed_kmh: f64,

    /// Cost added to every change of line (minutes).
    pub transfer_penalty_mins: f64,

    /// Lower bound on any edge weight, so very close stops never
    /// produce zero-cost edges (minutes).
    pub min_edge_weight_mins: f64,

    /// Lower bound on any segment's estimated duration (minutes).
    pub min_segment_mins: f64,

    /// Number of network fetches issued concurrently while building.
    pub fetch_batch_size: usize,

    /// Extracted shapes with fewer points than this are upsampled.
    pub shape_dense_threshold: usize,

    /// Minimum point count after upsampling a sparse shape.
    pub shape_upsample_min_points: usize,

    /// Upsampled shapes get this multiple of their extracted points, if more than the minimum.
    pub shape_upsample_factor: usize,

    /// Number of points drawn for a walking segment.
    pub walk_geometry_points: usize,
}

impl PlannerConfig {
    /// Set the transfer penalty.
    pub fn with_transfer_penalty(mut self, mins: f64) -> Self {
        self.transfer_penalty_mins = mins;
        self
    }

    /// Set the ride speed.
    pub fn with_ride_speed(mut self, kmh: f64) -> Self {
        self.ride_speed_kmh = kmh;
        self
    }

    /// Set the walking speed.
    pub fn with_walking_speed(mut self, kmh: f64) -> Self {
        self.walking_speed_kmh = kmh;
        self
    }

    /// Set the fetch batch size.
    pub fn with_fetch_batch_size(mut self, n: usize) -> Self {
        self.fetch_batch_size = n;
        self
    }

    /// Target point count when upsampling an extracted shape of `len` points.
    pub fn upsample_target(&self, len: usize) -> usize {
        self.shape_upsample_min_points
            .max(len * self.shape_upsample_factor)
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            ride_speed_kmh: 30.0,
            walking_speed_kmh: 4.5,
            transfer_penalty_mins: 3.0,
            min_edge_weight_mins: 1.0,
            min_segment_mins: 1.0,
            fetch_batch_size: 16,
            shape_dense_threshold: 10,
            shape_upsample_min_points: 20,
            shape_upsample_factor: 3,
            walk_geometry_points: 15,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlannerConfig::default();

        assert_eq!(config.ride_speed_kmh, 30.0);
        assert_eq!(config.walking_speed_kmh, 4.5);
        assert_eq!(config.transfer_penalty_mins, 3.0);
        assert_eq!(config.min_edge_weight_mins, 1.0);
        assert_eq!(config.min_segment_mins, 1.0);
        assert_eq!(config.fetch_batch_size, 16);
        assert_eq!(config.shape_dense_threshold, 10);
        assert_eq!(config.walk_geometry_points, 15);
    }

    #[test]
    fn upsample_target() {
        let config = PlannerConfig::default();

        assert_eq!(config.upsample_target(2), 20);
        assert_eq!(config.upsample_target(6), 20);
        assert_eq!(config.upsample_target(7), 21);
        assert_eq!(config.upsample_target(9), 27);
    }

    #[test]
    fn builder_setters() {
        let config = PlannerConfig::default()
            .with_transfer_penalty(5.0)
            .with_ride_speed(40.0)
            .with_walking_speed(5.0)
            .with_fetch_batch_size(4);

        assert_eq!(config.transfer_penalty_mins, 5.0);
        assert_eq!(config.ride_speed_kmh, 40.0);
        assert_eq!(config.walking_speed_kmh, 5.0);
        assert_eq!(config.fetch_batch_size, 4);
    }
}
