use crossbeam_channel::{bounded, unbounded};
use std::thread;

/// Runs `work` over `items` on `num_threads` scoped workers and returns the
/// results in input order.
///
/// Items are fed through a bounded channel so at most a couple of jobs per
/// worker are queued at any time. With one thread (or one item) everything
/// runs on the caller's thread.
pub fn run_ordered<T, R, F>(items: Vec<T>, num_threads: usize, work: F) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Sync,
{
    let total = items.len();
    if num_threads <= 1 || total <= 1 {
        return items.into_iter().map(work).collect();
    }

    let workers = num_threads.min(total);
    let (job_tx, job_rx) = bounded::<(usize, T)>(workers * 2);
    let (result_tx, result_rx) = unbounded::<(usize, R)>();
    let work = &work;

    thread::scope(|scope| {
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            scope.spawn(move || {
                while let Ok((idx, item)) = job_rx.recv() {
                    if result_tx.send((idx, work(item))).is_err() {
                        break;
                    }
                }
            });
        }
        drop(job_rx);
        drop(result_tx);

        for job in items.into_iter().enumerate() {
            if job_tx.send(job).is_err() {
                break;
            }
        }
        drop(job_tx);
    });

    let mut slots: Vec<Option<R>> = (0..total).map(|_| None).collect();
    for (idx, result) in result_rx.try_iter() {
        slots[idx] = Some(result);
    }
    slots.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_keep_input_order() {
        let items: Vec<u64> = (0..50).collect();
        let squares = run_ordered(items.clone(), 4, |x| x * x);
        assert_eq!(squares, items.iter().map(|x| x * x).collect::<Vec<_>>());
    }

    #[test]
    fn test_single_thread_path() {
        let out = run_ordered(vec!["a", "b"], 1, |s| s.to_uppercase());
        assert_eq!(out, vec!["A", "B"]);
    }

    #[test]
    fn test_empty_input() {
        let out: Vec<u8> = run_ordered(Vec::<u8>::new(), 8, |x| x);
        assert!(out.is_empty());
    }
}
