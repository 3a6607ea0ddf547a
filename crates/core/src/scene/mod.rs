use glam::Vec3;

use crate::{
    mesh::{self, TrackMesh},
    placement::{OrientationFrame, VehiclePlacer, MIN_PATH_POINTS},
    AnimationClock, AnimationState, BSplineCurve, ControlPoint, Result, TrackConfig, TrackError,
};

/// Everything derived from one set of control points. Assembled in full
/// before it replaces the previous track.
#[derive(Debug, Clone)]
pub struct GeneratedTrack {
    pub control_points: Vec<ControlPoint>,
    /// Spline samples in the sketch convention (height in z).
    pub curve: BSplineCurve,
    /// Ribbon mesh in the viewer convention (height in y).
    pub mesh: TrackMesh,
    /// Curve samples in the viewer convention; the vehicle rides these.
    pub path: Vec<Vec3>,
}

impl GeneratedTrack {
    /// Runs the whole pipeline. `None` when there are too few control points
    /// for a curve; an error when the curve is too short to drive on.
    pub fn build(control_points: &[ControlPoint], config: &TrackConfig) -> Result<Option<Self>> {
        config.validate()?;
        let input = control_points.iter().map(|p| p.to_vec3()).collect();
        let curve = BSplineCurve::new(input, config.points_per_segment)?;
        if curve.is_empty() {
            return Ok(None);
        }
        check_drivable(curve.points())?;

        let mesh = mesh::extrude_with(curve.points(), config.width, config.perpendicular)?
            .swap_yz();
        let path = curve.points().iter().copied().map(mesh::swap_yz).collect();
        Ok(Some(Self {
            control_points: control_points.to_vec(),
            curve,
            mesh,
            path,
        }))
    }
}

fn check_drivable(path: &[Vec3]) -> Result<()> {
    if path.len() < MIN_PATH_POINTS {
        return Err(TrackError::invalid(format!(
            "a track needs at least {MIN_PATH_POINTS} path points, got {}",
            path.len()
        )));
    }
    Ok(())
}

/// What the vehicle is currently riding.
#[derive(Debug)]
enum Ride {
    Generated(GeneratedTrack),
    /// A path replayed without the control points or mesh it came from.
    Loaded(Vec<Vec3>),
}

impl Ride {
    fn path(&self) -> &[Vec3] {
        match self {
            Ride::Generated(track) => &track.path,
            Ride::Loaded(path) => path,
        }
    }
}

/// Owns the current track and the vehicle animation that runs on it.
///
/// The track, the animation state and the placer history are only ever
/// replaced together, so the vehicle never indexes a path it was not
/// computed against.
#[derive(Debug)]
pub struct TrackScene {
    config: TrackConfig,
    ride: Option<Ride>,
    animation: AnimationState,
    placer: VehiclePlacer,
}

impl TrackScene {
    pub fn new(config: TrackConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ride: None,
            animation: AnimationState::default(),
            placer: VehiclePlacer::new(),
        })
    }

    /// Starts a scene on an existing path, e.g. one loaded from disk. The
    /// scene has a path to ride but no [`GeneratedTrack`].
    pub fn with_path(config: TrackConfig, path: Vec<Vec3>) -> Result<Self> {
        check_drivable(&path)?;
        let mut scene = Self::new(config)?;
        scene.install(Some(Ride::Loaded(path)));
        Ok(scene)
    }

    pub fn config(&self) -> &TrackConfig {
        &self.config
    }

    /// The generated track, if the current path came from control points.
    pub fn track(&self) -> Option<&GeneratedTrack> {
        match &self.ride {
            Some(Ride::Generated(track)) => Some(track),
            _ => None,
        }
    }

    /// The path the vehicle rides; empty while there is nothing to ride.
    pub fn path(&self) -> &[Vec3] {
        self.ride.as_ref().map(Ride::path).unwrap_or_default()
    }

    pub fn animation(&self) -> AnimationState {
        self.animation
    }

    /// Rebuilds the track from new control points. On error the previous
    /// track stays in place; with fewer than four points the scene is left
    /// without a track.
    pub fn regenerate(&mut self, control_points: &[ControlPoint]) -> Result<bool> {
        let track = GeneratedTrack::build(control_points, &self.config)?;
        let has_track = track.is_some();
        match &track {
            Some(track) => tracing::info!(
                control_points = control_points.len(),
                path = track.path.len(),
                triangles = track.mesh.triangle_count(),
                "generated track"
            ),
            None => tracing::info!(
                control_points = control_points.len(),
                "not enough control points for a curve"
            ),
        }
        self.install(track.map(Ride::Generated));
        Ok(has_track)
    }

    fn install(&mut self, ride: Option<Ride>) {
        self.ride = ride;
        self.animation.reset();
        self.placer.reset();
    }

    /// Advances the animation by `delta` seconds and returns where the
    /// vehicle is now. `None` while there is nothing to ride.
    pub fn tick(&mut self, delta: f32) -> Result<Option<OrientationFrame>> {
        let Some(ride) = &self.ride else {
            return Ok(None);
        };
        let path = ride.path();
        self.animation = AnimationClock::advance(self.animation, delta, path.len());
        let frame = self.placer.place(path, self.animation.current_index)?;
        Ok(Some(frame))
    }
}
