type Observer = Box<dyn FnMut()>;

/// Subscribers for the three widget lifecycle events.
///
/// Fired synchronously, in registration order, on the thread delivering the
/// triggering host notification.
#[derive(Default)]
pub(crate) struct LifecycleObservers {
    initialized: Vec<Observer>,
    shutting_down: Vec<Observer>,
    render_frame: Vec<Observer>,
}

impl LifecycleObservers {
    pub(crate) fn add_initialized(&mut self, f: Observer) {
        self.initialized.push(f);
    }

    pub(crate) fn add_shutting_down(&mut self, f: Observer) {
        self.shutting_down.push(f);
    }

    pub(crate) fn add_render_frame(&mut self, f: Observer) {
        self.render_frame.push(f);
    }

    pub(crate) fn fire_initialized(&mut self) {
        fire(&mut self.initialized);
    }

    pub(crate) fn fire_shutting_down(&mut self) {
        fire(&mut self.shutting_down);
    }

    pub(crate) fn fire_render_frame(&mut self) {
        fire(&mut self.render_frame);
    }

    pub(crate) fn len(&self) -> usize {
        self.initialized.len() + self.shutting_down.len() + self.render_frame.len()
    }
}

fn fire(observers: &mut [Observer]) {
    for observer in observers.iter_mut() {
        observer();
    }
}
