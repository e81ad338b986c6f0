use crate::post::PostMode;

// ---------------------------------------------------------------------------
// ToggleState — the three user-facing switches
// ---------------------------------------------------------------------------

/// Current values of the runtime toggles. Copied into [`crate::FrameParams`]
/// once per frame; both passes read it, neither writes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleState {
    pub post_mode: PostMode,
    pub use_normal_map: bool,
    pub use_mipmap: bool,
}

impl Default for ToggleState {
    fn default() -> Self {
        Self {
            post_mode: PostMode::Passthrough,
            use_normal_map: true,
            use_mipmap: true,
        }
    }
}

impl ToggleState {
    /// Human-readable summary shown in the window title.
    pub fn title(&self) -> String {
        format!(
            "Texture Demo | N(NormalMap): {} | M(Mipmap): {} | Post(1-4): {}",
            on_off(self.use_normal_map),
            on_off(self.use_mipmap),
            self.post_mode.index() + 1,
        )
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "ON"
    } else {
        "OFF"
    }
}

// ---------------------------------------------------------------------------
// InputSnapshot — held/not-held state of the bound keys for one frame
// ---------------------------------------------------------------------------

/// Which controlling inputs are currently held. Produced by the windowing
/// layer once per frame; the machine below only ever sees these levels and
/// derives press edges itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    /// One entry per post mode, in [`PostMode::ALL`] order.
    pub mode_keys: [bool; 4],
    pub normal_map_key: bool,
    pub mipmap_key: bool,
}

/// Which parts of [`ToggleState`] were written during one update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Transition {
    pub post_mode: bool,
    pub normal_map: bool,
    pub mipmap: bool,
}

impl Transition {
    pub fn any(&self) -> bool {
        self.post_mode || self.normal_map || self.mipmap
    }
}

// ---------------------------------------------------------------------------
// Interaction — edge-triggered latches over ToggleState
// ---------------------------------------------------------------------------

/// Edge-triggered toggle machine.
///
/// Each control has a latch that closes on the first frame its input is seen
/// held and opens again only once the input is released, so holding a key for
/// N frames produces exactly one transition. The four mode keys share a
/// single latch: while any of them is held no further mode change happens.
#[derive(Debug, Clone, Default)]
pub struct Interaction {
    state: ToggleState,
    mode_latched: bool,
    normal_map_latched: bool,
    mipmap_latched: bool,
}

impl Interaction {
    pub fn new(state: ToggleState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    pub fn state(&self) -> ToggleState {
        self.state
    }

    /// Advance one frame. Returns what changed so the caller can run side
    /// effects (sampler reconfiguration, title update).
    pub fn update(&mut self, input: &InputSnapshot) -> Transition {
        let mut transition = Transition::default();

        if !self.mode_latched {
            // Later keys override earlier ones pressed in the same frame.
            for (mode, held) in PostMode::ALL.iter().zip(input.mode_keys) {
                if held {
                    self.state.post_mode = *mode;
                    self.mode_latched = true;
                    transition.post_mode = true;
                }
            }
        }
        if input.mode_keys.iter().all(|held| !held) {
            self.mode_latched = false;
        }

        if latch_edge(&mut self.normal_map_latched, input.normal_map_key) {
            self.state.use_normal_map = !self.state.use_normal_map;
            transition.normal_map = true;
        }

        if latch_edge(&mut self.mipmap_latched, input.mipmap_key) {
            self.state.use_mipmap = !self.state.use_mipmap;
            transition.mipmap = true;
        }

        transition
    }
}

/// Returns true on a not-held → held edge; keeps `latched` in step with `held`.
fn latch_edge(latched: &mut bool, held: bool) -> bool {
    let fired = held && !*latched;
    *latched = held;
    fired
}
