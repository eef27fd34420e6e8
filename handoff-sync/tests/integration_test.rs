//! Integration tests for the blocking queue API

use handoff_sync::{queue_blocking, QueueCfg, QueueError, SyncQueue, RUNTIME_THREAD_NAME};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

fn counting_producer(count: u32) -> impl FnMut() -> Result<Option<u32>, std::io::Error> {
    let mut next = 0;
    move || {
        let item = (next < count).then_some(next);
        next += 1;
        Ok(item)
    }
}

#[test]
fn test_items_arrive_in_order() {
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);

    let stats = queue_blocking(4, counting_producer(100), move |item: u32| {
        sink.lock().unwrap().push(item);
        Ok::<_, std::io::Error>(())
    })
    .expect("run failed");

    assert_eq!(*received.lock().unwrap(), (0..100).collect::<Vec<_>>());
    assert_eq!(stats.pushed, 100);
    assert_eq!(stats.consumed, 100);
    assert!(stats.is_complete());
}

#[test]
fn test_empty_stream_completes() {
    let stats = queue_blocking(1, counting_producer(0), |_item: u32| {
        Ok::<_, std::io::Error>(())
    })
    .expect("run failed");

    assert_eq!(stats.pushed, 0);
    assert!(stats.ended);
}

#[test]
fn test_closures_run_on_runtime_threads() {
    let names = Arc::new(Mutex::new(Vec::new()));
    let producer_names = Arc::clone(&names);
    let consumer_names = Arc::clone(&names);

    let mut produce = counting_producer(3);
    queue_blocking(
        2,
        move || {
            producer_names
                .lock()
                .unwrap()
                .push(thread::current().name().map(str::to_owned));
            produce()
        },
        move |_item: u32| {
            consumer_names
                .lock()
                .unwrap()
                .push(thread::current().name().map(str::to_owned));
            Ok::<_, std::io::Error>(())
        },
    )
    .expect("run failed");

    let names = names.lock().unwrap();
    assert_eq!(names.len(), 7);
    assert!(names
        .iter()
        .all(|name| name.as_deref() == Some(RUNTIME_THREAD_NAME)));
}

#[test]
fn test_slow_consumer_fills_buffer() {
    let stats = queue_blocking(3, counting_producer(20), |_item: u32| {
        thread::sleep(Duration::from_millis(5));
        Ok::<_, std::io::Error>(())
    })
    .expect("run failed");

    assert_eq!(stats.consumed, 20);
    assert_eq!(stats.high_water_mark, 3);
}

#[test]
fn test_consumer_error_stops_endless_producer() {
    let mut handled = 0;
    let result = queue_blocking(
        2,
        || Ok::<_, std::io::Error>(Some(1u8)),
        move |_item: u8| {
            handled += 1;
            if handled == 3 {
                Err(std::io::Error::other("disk full"))
            } else {
                Ok(())
            }
        },
    );

    match result {
        Err(QueueError::ConsumerFailed { stats, source, .. }) => {
            assert_eq!(stats.consumed, 2);
            assert_eq!(stats.in_flight(), 1);
            assert_eq!(source.to_string(), "disk full");
        }
        other => panic!("expected ConsumerFailed, got {other:?}"),
    }
}

#[test]
fn test_run_waits_for_in_progress_blocking_call() {
    let queue = SyncQueue::new(QueueCfg::new(4)).expect("runtime");
    let (started_tx, started_rx) = mpsc::channel();
    let finished = Arc::new(AtomicBool::new(false));
    let finished_flag = Arc::clone(&finished);

    let mut calls = 0u32;
    let producer = move || {
        calls += 1;
        if calls == 2 {
            started_tx.send(()).ok();
            thread::sleep(Duration::from_millis(300));
            finished_flag.store(true, Ordering::SeqCst);
        }
        Ok::<_, std::io::Error>(Some(calls))
    };
    // Fails while the producer is inside its second call
    let consumer = move |_item: u32| {
        started_rx
            .recv_timeout(Duration::from_secs(5))
            .map_err(|_| std::io::Error::other("producer never started"))?;
        Err::<(), _>(std::io::Error::other("target unavailable"))
    };

    let error = queue.run(producer, consumer).unwrap_err();
    assert!(error.is_consumer_failure());
    assert!(
        finished.load(Ordering::SeqCst),
        "run returned while the producer call was still running"
    );
}

#[test]
fn test_producer_error_is_reported() {
    let result = queue_blocking(
        2,
        || Err::<Option<u32>, _>(std::io::Error::other("source closed")),
        |_item: u32| Ok::<_, std::io::Error>(()),
    );

    let error = result.unwrap_err();
    assert!(error.is_producer_failure());
    assert_eq!(error.stats().unwrap().pushed, 0);
    assert!(error.to_string().contains("source closed"));
}

#[test]
fn test_producer_panic_is_reported_as_task_failure() {
    let result = queue_blocking(
        2,
        || -> Result<Option<u32>, std::io::Error> { panic!("boom") },
        |_item: u32| Ok::<_, std::io::Error>(()),
    );

    match result {
        Err(QueueError::TaskFailed { task, reason }) => {
            assert_eq!(task, "producer");
            assert_eq!(reason, "task panicked: boom");
        }
        other => panic!("expected TaskFailed, got {other:?}"),
    }
}

#[test]
fn test_zero_capacity_is_rejected() {
    let error = SyncQueue::new(QueueCfg::new(0)).err().expect("capacity 0 accepted");
    assert!(error.is_configuration_error());

    let error = queue_blocking(0, counting_producer(1), |_item: u32| {
        Ok::<_, std::io::Error>(())
    })
    .unwrap_err();
    assert_eq!(error.error_code(), 0x4001);
}

#[test]
fn test_sync_queue_runs_repeatedly() {
    let queue = SyncQueue::new(QueueCfg::new(2).with_name("batches")).expect("runtime");
    assert_eq!(queue.cfg().name, "batches");

    for count in [5, 0, 12] {
        let stats = queue
            .run(counting_producer(count), |_item: u32| {
                Ok::<_, std::io::Error>(())
            })
            .expect("run failed");
        assert_eq!(stats.consumed, count as u64);
    }
}
