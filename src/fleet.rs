//! Instance batches: launch-and-wait and terminate, fanned out through a
//! [`Dispatcher`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::batch::{Dispatcher, Outcome};
use crate::compute::{ComputeApi, LaunchRequest};
use crate::config::InstanceSettings;
use crate::error::FleetError;
use crate::wait::{launch_and_await, terminate, WaitPolicy};

/// One instance to launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchItem {
    pub index: u32,
    pub display_name: String,
}

impl fmt::Display for LaunchItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name)
    }
}

/// Names `count` instances `{prefix}-1` through `{prefix}-{count}`.
pub fn launch_items(prefix: &str, count: u32) -> Vec<LaunchItem> {
    (1..=count)
        .map(|index| LaunchItem {
            index,
            display_name: format!("{prefix}-{index}"),
        })
        .collect()
}

/// Launches every item and waits for each to reach RUNNING.
///
/// Successful outcomes carry the new instance id.
pub async fn launch_batch<O>(
    api: Arc<dyn ComputeApi>,
    settings: &InstanceSettings,
    compartment_id: &str,
    dispatcher: &Dispatcher,
    policy: WaitPolicy,
    items: Vec<LaunchItem>,
    observer: O,
) -> Vec<Outcome<LaunchItem, String>>
where
    O: FnMut(&Outcome<LaunchItem, String>),
{
    let settings = Arc::new(settings.clone());
    let compartment_id: Arc<str> = Arc::from(compartment_id);

    let op = move |item: LaunchItem| {
        let api = api.clone();
        let settings = settings.clone();
        let compartment_id = compartment_id.clone();
        async move {
            let request =
                LaunchRequest::from_settings(&settings, &compartment_id, item.display_name.clone());
            let poll_api = api.clone();
            launch_and_await(
                item,
                || async move {
                    log::info!("launching {}", request.display_name);
                    api.launch_instance(&request).await.map(|instance| instance.id)
                },
                move |instance_id: String| {
                    let api = poll_api.clone();
                    async move {
                        let instance = api.get_instance(&instance_id).await?;
                        log::debug!("{instance_id} is {}", instance.lifecycle_state);
                        Ok::<_, FleetError>(instance.lifecycle_state)
                    }
                },
                policy,
            )
            .await
        }
    };

    dispatcher.run_observed(items, op, observer).await
}

/// Terminates every instance id; successful outcomes carry the id again.
///
/// A request still pending after `deadline` ends as a timeout.
pub async fn terminate_batch<O>(
    api: Arc<dyn ComputeApi>,
    instance_ids: Vec<String>,
    dispatcher: &Dispatcher,
    deadline: Duration,
    observer: O,
) -> Vec<Outcome<String, String>>
where
    O: FnMut(&Outcome<String, String>),
{
    let op = move |instance_id: String| {
        let api = api.clone();
        async move {
            let request = |id: String| async move {
                log::info!("terminating {id}");
                api.terminate_instance(&id).await
            };
            terminate(instance_id, request, deadline).await
        }
    };

    dispatcher.run_observed(instance_ids, op, observer).await
}
