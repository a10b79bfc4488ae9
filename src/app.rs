use crate::config::{Config, FailurePolicy};
use crate::data::PricePoint;
use crate::persistence::PriceRepository;
use crate::scraper::Scraper;
use crate::transform::transform;
use log::{debug, error, info};
use std::io::Write;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub struct App<S: Scraper, P: PriceRepository> {
    config: Config,
    scraper: S,
    repository: Arc<P>,
    out: Box<dyn Write + Send>,
}

impl<S: Scraper, P: PriceRepository + 'static> App<S, P> {
    pub fn new(config: Config, scraper: S, repository: Arc<P>) -> Self {
        Self::with_output(config, scraper, repository, Box::new(std::io::stdout()))
    }

    pub fn with_output(
        config: Config,
        scraper: S,
        repository: Arc<P>,
        out: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            config,
            scraper,
            repository,
            out,
        }
    }

    /// Sets up the table, then polls until cancelled. Under
    /// `FailurePolicy::Abort` the first failed iteration ends the run with
    /// its error. Cancellation also drops an iteration that is still waiting
    /// on the network or the database.
    pub async fn run(&mut self, cancellation_token: CancellationToken) -> anyhow::Result<()> {
        self.repository.ensure_schema().await?;
        writeln!(self.out, "Tabela criada/verificada com sucesso!")?;

        let poll_interval = self.config.poll_interval();
        writeln!(
            self.out,
            "Iniciando ETL com atualização a cada {} segundos... (CTRL + C para interromper)",
            self.config.poll_interval_sec
        )?;

        loop {
            let outcome = tokio::select! {
                biased;
                _ = cancellation_token.cancelled() => None,
                outcome = self.run_iteration() => Some(outcome),
            };
            let Some(outcome) = outcome else {
                info!("Cancellation requested during iteration, exiting...");
                break;
            };

            match outcome {
                Ok(point) => debug!("Iteration finished at {}", point.captured_at),
                Err(e) => match self.config.on_failure {
                    FailurePolicy::Abort => {
                        error!("Iteration failed, stopping: {e:#}");
                        return Err(e);
                    }
                    FailurePolicy::Continue => {
                        error!("Iteration failed, polling again: {e:#}");
                    }
                },
            }

            tokio::select! {
                biased;
                _ = cancellation_token.cancelled() => {
                    info!("Cancellation requested, exiting...");
                    break;
                }
                _ = tokio::time::sleep(poll_interval) => {}
            }
        }

        Ok(())
    }

    /// One extract, transform and persist cycle.
    pub async fn run_iteration(&mut self) -> anyhow::Result<PricePoint> {
        let payload = self.scraper.fetch_spot_price().await?;
        let point = transform(&payload)?;
        writeln!(self.out, "Dados tratados: {}", serde_json::to_string(&point)?)?;

        self.repository.save_price(point.clone()).await?;
        writeln!(self.out, "[{}] Dados salvos no PostgreSQL!", point.captured_at)?;

        Ok(point)
    }
}
