use super::State;

/* Observer of a task's progress. Indexes address independent progress
 * tracks; the supervised trainer uses 0 for the whole training and 1 for
 * the current epoch. Implementations take &self and synchronize internally
 * so a task can carry them across threads. */
pub trait ProgressListener: Send + Sync {
    /* The task has started. */
    fn start(&self);

    /* The task has finished, whatever the terminal state. */
    fn end(&self);

    fn message(&self, index: usize, message: &str);

    /* Work increase against a total; non-positive increments carry no
     * information and may be ignored. */
    fn progress(&self, index: usize, work_increase: f64, total_work: f64);

    /* Zero the work done on one track. */
    fn reset(&self, index: usize);

    fn state(&self, state: State);

    fn indeterminate(&self, index: usize, indeterminate: bool);
}
