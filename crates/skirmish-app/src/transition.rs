//! Scene transitions: fade to black, load, fade back in.
//!
//! `alpha` is the opacity of the full-screen fade (0 clear, 1 black). Input
//! is blocked from the moment a transition starts until the fade-in ends.

/// Performs the actual scene switch while the screen is black.
pub trait SceneLoader {
    fn load_scene(&mut self, name: &str);
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Idle,
    FadingOut {
        scene: String,
        start_alpha: f64,
        elapsed: f64,
    },
    FadingIn {
        start_alpha: f64,
        elapsed: f64,
    },
}

#[derive(Debug, Clone)]
pub struct SceneTransition {
    fade_secs: f64,
    alpha: f64,
    phase: Phase,
}

impl SceneTransition {
    pub fn new(fade_secs: f64) -> Self {
        Self {
            fade_secs: fade_secs.max(0.0),
            alpha: 0.0,
            phase: Phase::Idle,
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn is_busy(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Whether UI input should be swallowed by the fade overlay.
    pub fn blocks_input(&self) -> bool {
        self.is_busy()
    }

    /// Begin a transition to `scene`. Ignored while another one is running.
    pub fn load_scene(&mut self, scene: &str) -> bool {
        if self.is_busy() {
            log::warn!("scene transition to '{scene}' ignored: a transition is already running");
            return false;
        }
        log::info!("transition to '{scene}'");
        self.phase = Phase::FadingOut {
            scene: scene.to_string(),
            start_alpha: self.alpha,
            elapsed: 0.0,
        };
        true
    }

    /// Advance the fade by `dt` seconds. The loader runs exactly once, on
    /// the update where the screen reaches full black.
    pub fn update<L: SceneLoader + ?Sized>(&mut self, dt: f64, loader: &mut L) {
        match &mut self.phase {
            Phase::Idle => {}
            Phase::FadingOut {
                scene,
                start_alpha,
                elapsed,
            } => {
                *elapsed += dt;
                let t = progress(*elapsed, self.fade_secs);
                self.alpha = lerp(*start_alpha, 1.0, t);
                if t >= 1.0 {
                    let scene = std::mem::take(scene);
                    loader.load_scene(&scene);
                    self.phase = Phase::FadingIn {
                        start_alpha: 1.0,
                        elapsed: 0.0,
                    };
                }
            }
            Phase::FadingIn {
                start_alpha,
                elapsed,
            } => {
                *elapsed += dt;
                let t = progress(*elapsed, self.fade_secs);
                self.alpha = lerp(*start_alpha, 0.0, t);
                if t >= 1.0 {
                    self.phase = Phase::Idle;
                }
            }
        }
    }
}

fn progress(elapsed: f64, duration: f64) -> f64 {
    if duration > 0.0 {
        (elapsed / duration).min(1.0)
    } else {
        1.0
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Loads(Vec<String>);

    impl SceneLoader for Loads {
        fn load_scene(&mut self, name: &str) {
            self.0.push(name.to_string());
        }
    }

    #[test]
    fn test_full_sequence() {
        let mut t = SceneTransition::new(1.0);
        let mut loads = Loads::default();
        assert!(!t.blocks_input());

        assert!(t.load_scene("arena"));
        assert!(t.blocks_input());

        t.update(0.5, &mut loads);
        assert!((t.alpha() - 0.5).abs() < 1e-12);
        assert!(loads.0.is_empty());

        t.update(0.5, &mut loads);
        assert_eq!(t.alpha(), 1.0);
        assert_eq!(loads.0, vec!["arena"]);
        assert!(t.blocks_input());

        t.update(0.25, &mut loads);
        assert!((t.alpha() - 0.75).abs() < 1e-12);
        t.update(1.0, &mut loads);
        assert_eq!(t.alpha(), 0.0);
        assert!(!t.blocks_input());
        assert_eq!(loads.0.len(), 1, "loader runs once");
    }

    #[test]
    fn test_second_request_ignored_while_busy() {
        let mut t = SceneTransition::new(1.0);
        let mut loads = Loads::default();
        t.load_scene("arena");
        assert!(!t.load_scene("gauntlet"));
        for _ in 0..10 {
            t.update(0.25, &mut loads);
        }
        assert_eq!(loads.0, vec!["arena"]);
        assert!(t.load_scene("gauntlet"));
    }

    #[test]
    fn test_zero_duration_loads_on_first_update() {
        let mut t = SceneTransition::new(0.0);
        let mut loads = Loads::default();
        t.load_scene("menu");
        t.update(0.0, &mut loads);
        assert_eq!(loads.0, vec!["menu"]);
        assert_eq!(t.alpha(), 1.0);
        t.update(0.0, &mut loads);
        assert!(!t.is_busy());
        assert_eq!(t.alpha(), 0.0);
    }
}
