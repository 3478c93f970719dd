// Schedule creation flow: form state, submission, alert lifecycle

use common::models::{Alert, ScheduleForm};
use tracing::{info, warn};

use crate::client::ScheduleApi;

pub const SCHEDULE_CREATED_MESSAGE: &str = "Successfully added schedule!";

/// Owns the create-schedule form, the configuration selection and the
/// transient alerts describing the latest submission attempt.
///
/// `submit` takes `&mut self`, so two submissions can never overlap.
#[derive(Debug, Default)]
pub struct ScheduleFormController {
    pub form: ScheduleForm,
    pub selected_configuration: String,
    alerts: Vec<Alert>,
}

impl ScheduleFormController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Alerts from the latest submission attempt, oldest first.
    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    /// Submit the current form.
    ///
    /// Alerts from the previous attempt are dropped up front. A successful
    /// submission appends one success alert and resets the form and the
    /// configuration selection to their empty defaults; a failed one appends
    /// one warning alert and leaves the fields untouched for correction.
    pub async fn submit(&mut self, api: &dyn ScheduleApi) {
        self.alerts.clear();

        match api
            .create_schedule(&self.form, &self.selected_configuration)
            .await
        {
            Ok(()) => {
                info!(schedule = %self.form.name, "schedule created");
                self.alerts.push(Alert::success(SCHEDULE_CREATED_MESSAGE));
                self.selected_configuration.clear();
                self.form = ScheduleForm::default();
            }
            Err(error) => {
                warn!(%error, "schedule creation failed");
                self.alerts.push(Alert::warning(error.user_message()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockScheduleApi;
    use common::errors::ApiError;
    use common::models::AlertKind;

    fn filled_controller() -> ScheduleFormController {
        let mut controller = ScheduleFormController::new();
        controller.selected_configuration = "configA".to_string();
        controller.form = ScheduleForm {
            name: "Job1".to_string(),
            group: "nightly".to_string(),
            adapter: "MailAdapter".to_string(),
            listener: "MailListener".to_string(),
            cron: "0 0 * * *".to_string(),
            interval: String::new(),
            message: "run".to_string(),
            description: "nightly mail run".to_string(),
            locker: true,
            lock_key: "mail-lock".to_string(),
        };
        controller
    }

    #[tokio::test]
    async fn successful_submit_resets_form_and_reports_success() {
        let mut api = MockScheduleApi::new();
        api.expect_create_schedule()
            .withf(|form, configuration| form.name == "Job1" && configuration == "configA")
            .times(1)
            .returning(|_, _| Ok(()));

        let mut controller = filled_controller();
        controller.submit(&api).await;

        let alerts = controller.alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::Success);
        assert_eq!(alerts[0].message, SCHEDULE_CREATED_MESSAGE);

        assert_eq!(controller.form, ScheduleForm::default());
        assert!(controller.selected_configuration.is_empty());
    }

    #[tokio::test]
    async fn rejected_submit_keeps_form_and_reports_server_message() {
        let mut api = MockScheduleApi::new();
        api.expect_create_schedule().times(1).returning(|_, _| {
            Err(ApiError::ServerRejected {
                message: "Invalid cron".to_string(),
            })
        });

        let mut controller = filled_controller();
        let submitted = controller.form.clone();
        controller.submit(&api).await;

        let alerts = controller.alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::Warning);
        assert_eq!(alerts[0].message, "Invalid cron");

        // Fields retain their submitted values for correction.
        assert_eq!(controller.form, submitted);
        assert_eq!(controller.selected_configuration, "configA");
    }

    #[tokio::test]
    async fn transport_failure_surfaces_its_message() {
        let mut api = MockScheduleApi::new();
        api.expect_create_schedule().times(1).returning(|_, _| {
            Err(ApiError::Transport {
                status: None,
                message: "connection refused".to_string(),
            })
        });

        let mut controller = filled_controller();
        controller.submit(&api).await;

        assert_eq!(controller.alerts()[0].message, "connection refused");
    }

    #[tokio::test]
    async fn alerts_from_the_previous_attempt_are_dropped() {
        let mut api = MockScheduleApi::new();
        let mut attempts = 0;
        api.expect_create_schedule().times(2).returning(move |_, _| {
            attempts += 1;
            if attempts == 1 {
                Err(ApiError::ServerRejected {
                    message: "Invalid cron".to_string(),
                })
            } else {
                Ok(())
            }
        });

        let mut controller = filled_controller();
        controller.submit(&api).await;
        assert_eq!(controller.alerts().len(), 1);

        controller.submit(&api).await;
        let alerts = controller.alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::Success);
    }
}
