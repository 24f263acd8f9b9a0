//! How `compile_all` spreads units over threads.

#[cfg(feature = "rayon-executor")]
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Executor {
    /// One unit after another on the calling thread.
    Sync,

    /// Rayon's global work-stealing pool.
    #[cfg(feature = "rayon-executor")]
    Rayon,
}

impl Executor {
    /// The parallel executor when requested and compiled in, else [`Executor::Sync`].
    pub fn for_config(parallel: bool) -> Self {
        #[cfg(feature = "rayon-executor")]
        if parallel {
            return Executor::Rayon;
        }
        let _ = parallel;
        Executor::Sync
    }

    /// Maps every item, keeping input order in the output.
    pub fn execute_all<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Send + Sync,
    {
        match self {
            Executor::Sync => items.into_iter().map(f).collect(),
            #[cfg(feature = "rayon-executor")]
            Executor::Rayon => items.into_par_iter().map(f).collect(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Executor::Sync => "SyncExecutor",
            #[cfg(feature = "rayon-executor")]
            Executor::Rayon => "RayonExecutor",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_when_not_parallel() {
        assert_eq!(Executor::for_config(false), Executor::Sync);
    }

    #[test]
    fn test_order_is_preserved() {
        let exec = Executor::for_config(true);
        let out = exec.execute_all((0..100).collect(), |x: i32| x * 2);
        assert_eq!(out, (0..100).map(|x| x * 2).collect::<Vec<_>>());
    }

    #[cfg(feature = "rayon-executor")]
    #[test]
    fn test_rayon_selected_when_parallel() {
        assert_eq!(Executor::for_config(true).name(), "RayonExecutor");
    }
}
