use draw3d_core::Vec3;

/// Position a drone published after drawing one iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DroneState {
    pub id: u8,
    pub iteration: usize,
    pub position: Vec3,
}

impl DroneState {
    /// `[id, x, y, z]`, the layout handed to partner drones.
    pub fn to_vector(&self) -> [f64; 4] {
        [
            f64::from(self.id),
            self.position.x,
            self.position.y,
            self.position.z,
        ]
    }
}

/// One history per drone id. Slot `k` is written by drone `k` only.
#[derive(Debug, Default)]
pub struct DroneSlots {
    history: [Vec<DroneState>; 2],
}

impl DroneSlots {
    pub const CAPACITY: usize = 2;

    pub fn partner(id: u8) -> u8 {
        (id + 1) % 2
    }

    pub fn publish(&mut self, state: DroneState) {
        if let Some(slot) = self.history.get_mut(usize::from(state.id)) {
            slot.push(state);
        }
    }

    /// Most recent state of `id` published for an iteration before `iteration`.
    pub fn latest_before(&self, id: u8, iteration: usize) -> Option<DroneState> {
        self.history
            .get(usize::from(id))?
            .iter()
            .rev()
            .find(|s| s.iteration < iteration)
            .copied()
    }

    pub fn clear(&mut self) {
        for slot in &mut self.history {
            slot.clear();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.history.iter().all(Vec::is_empty)
    }
}
