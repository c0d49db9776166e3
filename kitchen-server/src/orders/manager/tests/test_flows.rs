use super::*;

// ========================================================================
// 调度流程 (时钟暂停，分钟级步骤立即执行)
// ========================================================================

#[tokio::test(start_paused = true)]
async fn test_scheduled_lifecycle() {
    let manager = create_test_manager();
    place(&manager, dosa(5));
    let order = place(&manager, dosa(2));
    let id = order.order_id;
    assert_eq!(order.waiting_time, 5);
    assert_eq!(status_of(&manager, id), OrderStatus::Queued);

    advance_secs(2).await;
    assert_eq!(status_of(&manager, id), OrderStatus::Cooking);

    // 5 > 2 only, so one warning at minute 3
    advance_secs(3 * 60).await;
    let messages: Vec<_> = manager
        .list_notifications(Some(id))
        .into_iter()
        .map(|n| n.message)
        .collect();
    assert_eq!(
        messages,
        vec![
            "Your order is being prepared!".to_string(),
            "Your order will be ready in 2 minutes!".to_string(),
        ]
    );
    assert_eq!(status_of(&manager, id), OrderStatus::Cooking);

    advance_secs(2 * 60).await;
    assert_eq!(status_of(&manager, id), OrderStatus::Ready);
    let last = manager.list_notifications(Some(id)).pop().unwrap();
    assert_eq!(last.severity, NotificationLevel::Success);
    assert_eq!(last.message, "Your order is ready for pickup!");

    tokio::task::yield_now().await;
    assert_eq!(manager.pending_schedules(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_status_sequence_is_monotonic() {
    let manager = create_test_manager();
    let orders: Vec<_> = (0..12).map(|_| place(&manager, dosa(1))).collect();

    let mut last: Vec<OrderStatus> = orders.iter().map(|o| o.status).collect();
    for _ in 0..30 {
        advance_secs(30).await;
        for (idx, order) in orders.iter().enumerate() {
            let now = status_of(&manager, order.order_id);
            assert!(now >= last[idx], "order {idx} went back from {} to {now}", last[idx]);
            last[idx] = now;
        }
    }
    assert!(last.iter().all(|s| *s == OrderStatus::Ready));
}

#[tokio::test(start_paused = true)]
async fn test_warnings_precede_ready() {
    let manager = create_test_manager();
    place(&manager, pizza(2));
    let order = place(&manager, pizza(1));
    assert_eq!(order.waiting_time, 15);

    advance_secs(16 * 60).await;
    let notes = manager.list_notifications(Some(order.order_id));
    let messages: Vec<_> = notes.iter().map(|n| n.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "Your order is being prepared!",
            "Your order will be ready in 5 minutes!",
            "Your order will be ready in 2 minutes!",
            "Your order is ready for pickup!",
        ]
    );
    assert!(notes.windows(2).all(|w| w[0].created_at <= w[1].created_at));
}

#[tokio::test(start_paused = true)]
async fn test_zero_wait_cooks_then_ready() {
    let manager = create_test_manager();
    let order = place(&manager, dosa(3));
    assert_eq!(order.waiting_time, 0);

    advance_secs(2).await;
    assert_eq!(status_of(&manager, order.order_id), OrderStatus::Ready);
    let levels: Vec<_> = manager
        .list_notifications(Some(order.order_id))
        .into_iter()
        .map(|n| n.severity)
        .collect();
    assert_eq!(levels, vec![NotificationLevel::Info, NotificationLevel::Success]);
}

#[tokio::test(start_paused = true)]
async fn test_ready_orders_vacate_their_batch() {
    let manager = create_test_manager();
    place(&manager, dosa(5));
    assert_eq!(manager.preview_wait_time(&dosa(2)), 5);

    advance_secs(2).await;
    let b = place(&manager, dosa(2));
    assert_eq!(b.waiting_time, 0);
}

// ========================================================================
// Cancellation
// ========================================================================

#[tokio::test(start_paused = true)]
async fn test_completion_cancels_pending_steps() {
    let manager = create_test_manager();
    place(&manager, dosa(5));
    let order = place(&manager, dosa(2));
    let id = order.order_id;

    advance_secs(2).await;
    assert_eq!(status_of(&manager, id), OrderStatus::Cooking);
    assert!(manager.complete_order(id).unwrap());

    advance_secs(6 * 60).await;
    // Only the cooking notice; it outlives the order until expiry
    let notes = manager.list_notifications(Some(id));
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].severity, NotificationLevel::Info);
    assert!(manager.get_order(id).is_err());
}

#[tokio::test(start_paused = true)]
async fn test_manual_ready_cancels_schedule() {
    let manager = create_test_manager();
    place(&manager, dosa(5));
    let order = place(&manager, dosa(2));
    let id = order.order_id;

    advance_secs(2).await;
    assert_eq!(status_of(&manager, id), OrderStatus::Cooking);

    manager.advance_status(id, OrderStatus::Ready).unwrap();
    advance_secs(10 * 60).await;

    // Cooking notice from the schedule, Ready from the override, no warnings
    let levels: Vec<_> = manager
        .list_notifications(Some(id))
        .iter()
        .map(|n| n.severity)
        .collect();
    assert_eq!(
        levels,
        vec![NotificationLevel::Info, NotificationLevel::Success]
    );
    assert_eq!(status_of(&manager, id), OrderStatus::Ready);
}

#[tokio::test(start_paused = true)]
async fn test_manual_ready_from_queued_passes_through_cooking() {
    let manager = create_test_manager();
    let mut rx = manager.subscribe();
    let order = place(&manager, dosa(1));
    let id = order.order_id;

    let ready = manager.advance_status(id, OrderStatus::Ready).unwrap();
    assert_eq!(ready.status, OrderStatus::Ready);

    let notes = manager.list_notifications(Some(id));
    let levels: Vec<_> = notes.iter().map(|n| n.severity).collect();
    assert_eq!(
        levels,
        vec![NotificationLevel::Info, NotificationLevel::Success]
    );
    assert!(notes[0].id < notes[1].id);

    let mut transitions = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let QueueEvent::StatusChanged { from, to, .. } = event {
            transitions.push((from, to));
        }
    }
    assert_eq!(
        transitions,
        vec![
            (OrderStatus::Queued, OrderStatus::Cooking),
            (OrderStatus::Cooking, OrderStatus::Ready),
        ]
    );

    // The cancelled schedule adds nothing later
    advance_secs(10 * 60).await;
    assert_eq!(manager.list_notifications(Some(id)).len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_stops_everything() {
    let manager = create_test_manager();
    place(&manager, dosa(5));
    let order = place(&manager, dosa(2));

    manager.shutdown();
    advance_secs(10 * 60).await;
    assert_eq!(status_of(&manager, order.order_id), OrderStatus::Queued);
    assert!(manager.list_notifications(None).is_empty());
}

// ========================================================================
// Expiry
// ========================================================================

#[tokio::test(start_paused = true)]
async fn test_notifications_expire_after_window() {
    let manager = create_test_manager();
    place(&manager, dosa(1));

    advance_secs(2).await;
    assert_eq!(manager.list_notifications(None).len(), 2);

    // Emitted at +1s, expire at +601s
    advance_secs(588).await;
    assert_eq!(manager.list_notifications(None).len(), 2);

    advance_secs(15).await;
    assert!(manager.list_notifications(None).is_empty());
    assert_eq!(manager.unread_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_custom_expiry_and_cooking_delay() {
    let manager = create_manager_with(QueueConfig {
        cooking_start_delay: Duration::from_secs(30),
        notification_expiry: Duration::from_secs(60),
        ..QueueConfig::default()
    });
    let order = place(&manager, dosa(1));

    advance_secs(20).await;
    assert_eq!(status_of(&manager, order.order_id), OrderStatus::Queued);

    advance_secs(15).await;
    assert_eq!(status_of(&manager, order.order_id), OrderStatus::Ready);
    assert_eq!(manager.list_notifications(None).len(), 2);

    advance_secs(60).await;
    assert!(manager.list_notifications(None).is_empty());
}

// ========================================================================
// Event stream
// ========================================================================

#[tokio::test(start_paused = true)]
async fn test_events_follow_commits() {
    let manager = create_test_manager();
    let mut rx = manager.subscribe();

    let order = place(&manager, dosa(1));
    advance_secs(2).await;
    manager.complete_order(order.order_id).unwrap();

    let mut names = Vec::new();
    while let Ok(event) = rx.try_recv() {
        assert_eq!(event.order_id(), order.order_id);
        names.push(event.name());
    }
    assert_eq!(
        names,
        vec![
            "order_placed",
            "notification_emitted",
            "status_changed",
            "notification_emitted",
            "status_changed",
            "order_completed",
        ]
    );
}
