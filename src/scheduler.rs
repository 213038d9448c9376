use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimerCallback {
    SliderAutoplay,
}

#[derive(Debug, Clone)]
pub(crate) struct ScheduledTask {
    pub(crate) id: i64,
    pub(crate) due_at: i64,
    pub(crate) order: i64,
    pub(crate) interval_ms: Option<i64>,
    pub(crate) callback: TimerCallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTimer {
    pub id: i64,
    pub due_at: i64,
    pub order: i64,
    pub interval_ms: Option<i64>,
}

#[derive(Debug)]
pub(crate) struct SchedulerState {
    pub(crate) now_ms: i64,
    pub(crate) task_queue: Vec<ScheduledTask>,
    pub(crate) timer_step_limit: usize,
    pub(crate) next_timer_id: i64,
    pub(crate) next_task_order: i64,
    pub(crate) running_timer_id: Option<i64>,
    pub(crate) running_timer_canceled: bool,
}

impl Default for SchedulerState {
    fn default() -> Self {
        Self {
            now_ms: 0,
            task_queue: Vec::new(),
            timer_step_limit: 10_000,
            next_timer_id: 1,
            next_task_order: 0,
            running_timer_id: None,
            running_timer_canceled: false,
        }
    }
}

impl SchedulerState {
    pub(crate) fn allocate_task_order(&mut self) -> i64 {
        let order = self.next_task_order;
        self.next_task_order += 1;
        order
    }

    fn allocate_timer_id(&mut self) -> i64 {
        let id = self.next_timer_id;
        self.next_timer_id += 1;
        id
    }
}

impl Page {
    pub(crate) fn set_interval(&mut self, callback: TimerCallback, interval_ms: i64) -> i64 {
        let interval_ms = interval_ms.max(0);
        let id = self.scheduler.allocate_timer_id();
        let order = self.scheduler.allocate_task_order();
        let due_at = self.scheduler.now_ms.saturating_add(interval_ms);
        self.scheduler.task_queue.push(ScheduledTask {
            id,
            due_at,
            order,
            interval_ms: Some(interval_ms),
            callback,
        });
        self.trace_timer_line(format!(
            "[timer] schedule interval id={id} due_at={due_at} interval_ms={interval_ms}"
        ));
        id
    }

    pub(crate) fn clear_interval(&mut self, timer_id: i64) {
        let before = self.scheduler.task_queue.len();
        self.scheduler.task_queue.retain(|task| task.id != timer_id);
        let mut cleared = self.scheduler.task_queue.len() != before;
        if self.scheduler.running_timer_id == Some(timer_id) {
            self.scheduler.running_timer_canceled = true;
            cleared = true;
        }
        if cleared {
            self.trace_timer_line(format!("[timer] clear id={timer_id}"));
        }
    }

    pub fn now_ms(&self) -> i64 {
        self.scheduler.now_ms
    }

    pub fn set_timer_step_limit(&mut self, max_steps: usize) -> Result<()> {
        if max_steps == 0 {
            return Err(Error::InvalidConfig(
                "set_timer_step_limit requires at least 1 step".into(),
            ));
        }
        self.scheduler.timer_step_limit = max_steps;
        Ok(())
    }

    pub fn clear_timer(&mut self, timer_id: i64) -> bool {
        let existed = self.scheduler.running_timer_id == Some(timer_id)
            || self
                .scheduler
                .task_queue
                .iter()
                .any(|task| task.id == timer_id);
        self.clear_interval(timer_id);
        existed
    }

    pub fn clear_all_timers(&mut self) -> usize {
        let cleared = self.scheduler.task_queue.len();
        self.scheduler.task_queue.clear();
        if self.scheduler.running_timer_id.is_some() {
            self.scheduler.running_timer_canceled = true;
        }
        self.trace_timer_line(format!("[timer] clear_all cleared={cleared}"));
        cleared
    }

    pub fn pending_timers(&self) -> Vec<PendingTimer> {
        let mut timers = self
            .scheduler
            .task_queue
            .iter()
            .map(|task| PendingTimer {
                id: task.id,
                due_at: task.due_at,
                order: task.order,
                interval_ms: task.interval_ms,
            })
            .collect::<Vec<_>>();
        timers.sort_by_key(|timer| (timer.due_at, timer.order));
        timers
    }

    pub fn advance_time(&mut self, delta_ms: i64) -> Result<()> {
        if delta_ms < 0 {
            return Err(Error::Runtime(
                "advance_time requires non-negative milliseconds".into(),
            ));
        }
        let from = self.scheduler.now_ms;
        let to = from.saturating_add(delta_ms);
        let ran = self.run_timers_until(to)?;
        self.trace_timer_line(format!(
            "[timer] advance delta_ms={delta_ms} from={from} to={to} ran_due={ran}"
        ));
        Ok(())
    }

    pub fn advance_time_to(&mut self, target_ms: i64) -> Result<()> {
        if target_ms < self.scheduler.now_ms {
            return Err(Error::Runtime(format!(
                "advance_time_to requires target >= now_ms (target={target_ms}, now_ms={})",
                self.scheduler.now_ms
            )));
        }
        let from = self.scheduler.now_ms;
        let ran = self.run_timers_until(target_ms)?;
        self.trace_timer_line(format!(
            "[timer] advance_to from={from} to={target_ms} ran_due={ran}"
        ));
        Ok(())
    }

    /// Runs every pending task in due order, advancing the clock to each.
    pub fn flush(&mut self) -> Result<()> {
        let from = self.scheduler.now_ms;
        let ran = self.run_timer_queue(None)?;
        self.trace_timer_line(format!(
            "[timer] flush from={from} to={} ran={ran}",
            self.scheduler.now_ms
        ));
        Ok(())
    }

    pub fn run_next_timer(&mut self) -> Result<bool> {
        let Some(next_idx) = self.next_task_index(None) else {
            self.trace_timer_line("[timer] run_next none".into());
            return Ok(false);
        };

        let task = self.scheduler.task_queue.remove(next_idx);
        if task.due_at > self.scheduler.now_ms {
            self.scheduler.now_ms = task.due_at;
        }
        self.execute_timer_task(task)?;
        Ok(true)
    }

    pub fn run_due_timers(&mut self) -> Result<usize> {
        let ran = self.run_timer_queue(Some(self.scheduler.now_ms))?;
        self.trace_timer_line(format!(
            "[timer] run_due now_ms={} ran={ran}",
            self.scheduler.now_ms
        ));
        Ok(ran)
    }

    // Each task observes the clock at its own due time, so a repeating
    // task fires once per elapsed period.
    fn run_timers_until(&mut self, target_ms: i64) -> Result<usize> {
        let ran = self.run_timer_queue(Some(target_ms))?;
        self.scheduler.now_ms = target_ms;
        Ok(ran)
    }

    fn run_timer_queue(&mut self, due_limit: Option<i64>) -> Result<usize> {
        let mut steps = 0usize;
        while let Some(next_idx) = self.next_task_index(due_limit) {
            steps += 1;
            if steps > self.scheduler.timer_step_limit {
                return Err(self.timer_step_limit_error(steps, due_limit));
            }
            let task = self.scheduler.task_queue.remove(next_idx);
            if task.due_at > self.scheduler.now_ms {
                self.scheduler.now_ms = task.due_at;
            }
            self.execute_timer_task(task)?;
        }
        Ok(steps)
    }

    fn timer_step_limit_error(&self, steps: usize, due_limit: Option<i64>) -> Error {
        let due_limit_desc = due_limit
            .map(|value| value.to_string())
            .unwrap_or_else(|| "none".into());
        Error::Runtime(format!(
            "timer queue exceeded max task steps (possible uncleared interval): limit={}, steps={steps}, now_ms={}, due_limit={due_limit_desc}, pending_tasks={}",
            self.scheduler.timer_step_limit,
            self.scheduler.now_ms,
            self.scheduler.task_queue.len(),
        ))
    }

    fn next_task_index(&self, due_limit: Option<i64>) -> Option<usize> {
        self.scheduler
            .task_queue
            .iter()
            .enumerate()
            .filter(|(_, task)| due_limit.is_none_or(|limit| task.due_at <= limit))
            .min_by_key(|(_, task)| (task.due_at, task.order))
            .map(|(idx, _)| idx)
    }

    fn execute_timer_task(&mut self, task: ScheduledTask) -> Result<()> {
        stacker::grow(32 * 1024 * 1024, || self.execute_timer_task_impl(task))
    }

    fn execute_timer_task_impl(&mut self, task: ScheduledTask) -> Result<()> {
        let interval_desc = task
            .interval_ms
            .map(|value| value.to_string())
            .unwrap_or_else(|| "none".into());
        self.trace_timer_line(format!(
            "[timer] run id={} due_at={} interval_ms={} now_ms={}",
            task.id, task.due_at, interval_desc, self.scheduler.now_ms
        ));

        self.scheduler.running_timer_id = Some(task.id);
        self.scheduler.running_timer_canceled = false;
        let result = self.run_timer_callback(task.callback);
        let canceled = self.scheduler.running_timer_canceled;
        self.scheduler.running_timer_id = None;
        self.scheduler.running_timer_canceled = false;
        result?;

        if let Some(interval_ms) = task.interval_ms {
            if !canceled {
                let id = task.id;
                // Zero-length intervals still move forward so the queue cannot spin in place.
                let due_at = task.due_at.saturating_add(interval_ms.max(1));
                let order = self.scheduler.allocate_task_order();
                self.scheduler.task_queue.push(ScheduledTask {
                    due_at,
                    order,
                    ..task
                });
                self.trace_timer_line(format!(
                    "[timer] requeue id={id} due_at={due_at} interval_ms={interval_ms}"
                ));
            }
        }

        Ok(())
    }

    fn run_timer_callback(&mut self, callback: TimerCallback) -> Result<()> {
        match callback {
            TimerCallback::SliderAutoplay => self.with_slider(|slider, page| slider.autoplay_tick(page)),
        }
    }
}
