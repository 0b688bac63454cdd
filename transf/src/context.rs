//! Scoped variables and dynamic tables.

use crate::builder::Vars;
use crate::error::{Error, Fatal};
use crate::stack::Stack;
use crate::table::Table;
use crate::Term;
use fnv::FnvHashMap;

/// Variables and tables declared by one scope.
#[derive(Clone, Debug, Default)]
pub struct Frame {
    vars: FnvHashMap<String, Option<Term>>,
    tables: FnvHashMap<String, Table>,
}

impl Frame {
    pub fn new() -> Self {
        Default::default()
    }

    /// Declare a variable without value.
    pub fn declare(&mut self, name: String) {
        self.vars.insert(name, None);
    }

    /// Declare a variable with value.
    pub fn bind(&mut self, name: String, tm: Term) {
        self.vars.insert(name, Some(tm));
    }

    /// Declare an empty table.
    pub fn declare_table(&mut self, name: String) {
        self.tables.insert(name, Table::default());
    }
}

/// Global frame and stack of local frames, the innermost frame being on top.
///
/// Lookups search from the innermost frame outwards,
/// and updates modify the frame that declared the name.
///
/// ~~~
/// # use transf::{Context, Factory, Frame};
/// let f = Factory::new();
/// let mut ctx = Context::new();
/// ctx.declare("x".to_string());
/// ctx.with_frame(Frame::new(), |ctx| Ok(ctx.set("x", f.int(1))?))?;
/// assert_eq!(ctx.get("x")?, Some(f.int(1)));
/// # Ok::<_, transf::Error>(())
/// ~~~
#[derive(Clone, Debug, Default)]
pub struct Context {
    global: Frame,
    locals: Stack<Frame>,
}

impl Context {
    /// Create a context with an empty global frame.
    pub fn new() -> Self {
        Default::default()
    }

    /// Return the number of frames, including the global frame.
    pub fn depth(&self) -> usize {
        self.locals.len() + 1
    }

    fn top(&mut self) -> &mut Frame {
        match self.locals.iter_mut().next() {
            Some(frame) => frame,
            None => &mut self.global,
        }
    }

    /// Iterate through the frames from the innermost to the global one.
    fn frames(&self) -> impl Iterator<Item = &Frame> {
        self.locals.iter().chain(core::iter::once(&self.global))
    }

    fn frames_mut(&mut self) -> impl Iterator<Item = &mut Frame> {
        let global = core::iter::once(&mut self.global);
        self.locals.iter_mut().chain(global)
    }

    /// Declare a variable without value in the innermost frame.
    pub fn declare(&mut self, name: String) {
        self.top().declare(name)
    }

    /// Declare an empty table in the innermost frame.
    pub fn declare_table(&mut self, name: String) {
        self.top().declare_table(name)
    }

    fn slot(&mut self, name: &str) -> Result<&mut Option<Term>, Fatal> {
        let mut slots = self.frames_mut().filter_map(|fr| fr.vars.get_mut(name));
        slots.next().ok_or_else(|| Fatal::UndeclaredVar(name.to_string()))
    }

    /// Return the value of a variable, or `None` if it has no value.
    pub fn get(&self, name: &str) -> Result<Option<Term>, Fatal> {
        match self.frames().find_map(|fr| fr.vars.get(name)) {
            Some(tm) => Ok(tm.clone()),
            None => Err(Fatal::UndeclaredVar(name.to_string())),
        }
    }

    pub fn set(&mut self, name: &str, tm: Term) -> Result<(), Fatal> {
        *self.slot(name)? = Some(tm);
        Ok(())
    }

    /// Remove the value of a variable.
    pub fn unset(&mut self, name: &str) -> Result<(), Fatal> {
        *self.slot(name)? = None;
        Ok(())
    }

    pub fn table(&self, name: &str) -> Result<&Table, Fatal> {
        let table = self.frames().find_map(|fr| fr.tables.get(name));
        table.ok_or_else(|| Fatal::UndeclaredTable(name.to_string()))
    }

    pub fn table_mut(&mut self, name: &str) -> Result<&mut Table, Fatal> {
        let mut tables = self.frames_mut().filter_map(|fr| fr.tables.get_mut(name));
        tables.next().ok_or_else(|| Fatal::UndeclaredTable(name.to_string()))
    }

    /// Push a frame, run a function, then pop the frame.
    ///
    /// The frame is popped also if the function fails.
    pub fn with_frame<Y, F>(&mut self, frame: Frame, f: F) -> Result<Y, Error>
    where
        F: FnOnce(&mut Self) -> Result<Y, Error>,
    {
        self.locals.push(frame);
        let y = f(self);
        self.locals.pop();
        y
    }
}

impl Vars for Context {
    fn lookup(&self, name: &str) -> Result<Option<Term>, Fatal> {
        self.get(name)
    }
}
