use approx::assert_relative_eq;
use csv::ReaderBuilder;
use pose_odometry::{
    FusionConfig, FusionDriver, FusionOutput, Header, Odometry, OdometrySink, PoseSample,
    PoseStamped, Position, Quaternion, TransformStamped,
};
use serde::Deserialize;
use std::error::Error;

/// A recorded motion capture pose.
#[derive(Debug, Deserialize)]
struct PoseRecord {
    /// The sample time, in seconds.
    #[serde(rename = "host_time")]
    time: f64,
    frame_id: String,
    x: f64,
    y: f64,
    z: f64,
    qw: f64,
    qx: f64,
    qy: f64,
    qz: f64,
}

impl From<PoseRecord> for PoseSample<f64> {
    fn from(record: PoseRecord) -> Self {
        PoseSample::new(
            Header::new(record.time, record.frame_id),
            Position::new(record.x, record.y, record.z),
            Quaternion::new(record.qw, record.qx, record.qy, record.qz),
        )
    }
}

fn read_csv(file_path: &str) -> Result<Vec<PoseSample<f64>>, Box<dyn Error>> {
    let mut rdr = ReaderBuilder::new().from_path(file_path)?;
    let mut data = Vec::new();

    for result in rdr.deserialize() {
        let record: PoseRecord = result?;
        data.push(record.into());
    }

    Ok(data)
}

fn replay(file_path: &str) -> Vec<FusionOutput<f64>> {
    let samples = read_csv(file_path).expect("failed to read pose log");
    let mut driver = FusionDriver::new(FusionConfig::<f64>::default()).unwrap();
    samples
        .iter()
        .map(|sample| driver.process(sample).unwrap())
        .collect()
}

/// Constant linear velocity `(0.8, -0.3, 0.1)` m/s and yaw rate 0.25 rad/s at about 20 Hz
/// with jittered timestamps and 1 mm position noise.
const CONSTANT_VELOCITY_YAW: &str = "tests/data/constant_velocity_yaw.csv";

#[test]
fn replay_converges_to_linear_velocity() {
    let outputs = replay(CONSTANT_VELOCITY_YAW);
    assert_eq!(outputs.len(), 200);

    let tail = &outputs[100..];
    let count = tail.len() as f64;
    let mean_x = tail.iter().map(|o| o.odometry.velocity.x).sum::<f64>() / count;
    let mean_y = tail.iter().map(|o| o.odometry.velocity.y).sum::<f64>() / count;
    let mean_z = tail.iter().map(|o| o.odometry.velocity.z).sum::<f64>() / count;
    assert_relative_eq!(mean_x, 0.8, epsilon = 1e-2);
    assert_relative_eq!(mean_y, -0.3, epsilon = 1e-2);
    assert_relative_eq!(mean_z, 0.1, epsilon = 1e-2);

    for output in tail {
        assert_relative_eq!(output.odometry.velocity.x, 0.8, epsilon = 0.1);
        assert_relative_eq!(output.odometry.velocity.y, -0.3, epsilon = 0.1);
        assert_relative_eq!(output.odometry.velocity.z, 0.1, epsilon = 0.1);
    }
}

#[test]
fn replay_tracks_observed_positions() {
    let samples = read_csv(CONSTANT_VELOCITY_YAW).unwrap();
    let outputs = replay(CONSTANT_VELOCITY_YAW);

    for (sample, output) in samples.iter().zip(&outputs).skip(10) {
        assert_relative_eq!(output.odometry.position.x, sample.position.x, epsilon = 5e-3);
        assert_relative_eq!(output.odometry.position.y, sample.position.y, epsilon = 5e-3);
        assert_relative_eq!(output.odometry.position.z, sample.position.z, epsilon = 5e-3);
        assert_eq!(output.mocap_pose.position, sample.position);
        assert_eq!(output.odometry.orientation, sample.orientation);
    }
}

#[test]
fn replay_differentiates_yaw_rate() {
    let outputs = replay(CONSTANT_VELOCITY_YAW);
    for output in &outputs[1..] {
        let rate = output.odometry.angular_velocity;
        assert_relative_eq!(rate.omega_x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(rate.omega_y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(rate.omega_z, 0.25, epsilon = 1e-3);
    }
}

#[test]
fn replay_local_odometry_starts_at_origin() {
    let samples = read_csv(CONSTANT_VELOCITY_YAW).unwrap();
    let origin = samples[0].position;
    let outputs = replay(CONSTANT_VELOCITY_YAW);

    for output in &outputs {
        assert_eq!(
            output.local_odometry.position,
            output.odometry.position - origin
        );
    }
}

#[test]
fn replay_covariance_stays_symmetric() {
    let outputs = replay(CONSTANT_VELOCITY_YAW);
    for output in &outputs {
        assert!(output.odometry.position_covariance.is_symmetric(1e-12));
        assert!(output.odometry.velocity_covariance.is_symmetric(1e-12));
        for i in 0..3 {
            assert!(output.odometry.position_covariance[(i, i)] >= 0.0);
            assert!(output.odometry.velocity_covariance[(i, i)] >= 0.0);
        }
    }
}

#[derive(Default)]
struct CountingSink {
    odometry: usize,
    local_odometry: usize,
    mocap_poses: usize,
    transforms: usize,
}

impl OdometrySink<f64, Quaternion<f64>> for CountingSink {
    fn odometry(&mut self, _odometry: &Odometry<f64>) {
        self.odometry += 1;
    }

    fn local_odometry(&mut self, _odometry: &Odometry<f64>) {
        self.local_odometry += 1;
    }

    fn mocap_pose(&mut self, pose: &PoseStamped<f64>) {
        assert_eq!(pose.header.frame_id, "fcu");
        self.mocap_poses += 1;
    }

    fn transform(&mut self, transform: &TransformStamped<f64>) {
        assert_eq!(transform.child_frame_id, "base_link");
        self.transforms += 1;
    }
}

#[test]
fn replay_into_sink() {
    let samples = read_csv(CONSTANT_VELOCITY_YAW).unwrap();
    let mut driver = FusionDriver::new(FusionConfig::<f64>::default()).unwrap();
    let mut sink = CountingSink::default();
    for sample in &samples {
        driver.process_into(sample, &mut sink).unwrap();
    }

    assert_eq!(sink.odometry, samples.len());
    assert_eq!(sink.local_odometry, samples.len());
    assert_eq!(sink.mocap_poses, samples.len());
    assert_eq!(sink.transforms, samples.len());
}
