use crate::menu::{Menu, MenuCore, MenuHandler};

/// A menu whose contents are entirely the handler's buttons and decoration.
#[derive(Debug)]
pub struct StandardMenu<H> {
    core: MenuCore,
    handler: H,
}

impl<H: MenuHandler> StandardMenu<H> {
    /// Pair a core with a handler.
    pub fn new(core: MenuCore, handler: H) -> Self {
        Self { core, handler }
    }

    /// Boxed, ready for [`MenuManager::insert`](crate::MenuManager::insert).
    pub fn boxed(core: MenuCore, handler: H) -> Box<dyn Menu> {
        Box::new(Self::new(core, handler))
    }

    /// The handler.
    pub fn state(&self) -> &H {
        &self.handler
    }

    /// The handler, mutably.
    pub fn state_mut(&mut self) -> &mut H {
        &mut self.handler
    }
}

impl<H: MenuHandler> Menu for StandardMenu<H> {
    fn core(&self) -> &MenuCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut MenuCore {
        &mut self.core
    }

    fn handler(&self) -> &dyn MenuHandler {
        &self.handler
    }

    fn handler_mut(&mut self) -> &mut dyn MenuHandler {
        &mut self.handler
    }

    fn parts_mut(&mut self) -> (&mut MenuCore, &mut dyn MenuHandler) {
        (&mut self.core, &mut self.handler)
    }

    fn new_instance(&self) -> Option<Box<dyn Menu>> {
        let handler = self.handler.fresh()?;
        Some(Self::boxed(self.core.fresh_copy(), handler))
    }
}
