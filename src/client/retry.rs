// src/client/retry.rs

use std::{fmt::Display, future::Future, time::Duration};

/// Novas tentativas da busca combinada (funcionários + cargos) da listagem.
pub const LIST_FETCH_RETRIES: u32 = 3;

/// Espera fixa entre tentativas, sem backoff exponencial.
pub const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Executa `op` e, se falhar, repete até `retries` vezes com espera fixa.
/// Não há cancelamento nem chave de idempotência: cada tentativa é uma
/// requisição nova.
pub async fn with_retry<T, E, F, Fut>(retries: u32, delay: Duration, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut remaining = retries;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if remaining > 0 => {
                tracing::warn!("Fetch failed: {}. Retrying... ({} attempts left)", e, remaining);
                remaining -= 1;
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_transient_failures() {
        let attempts = &AtomicU32::new(0);
        let started = Instant::now();

        let result: Result<u32, String> = with_retry(LIST_FETCH_RETRIES, RETRY_DELAY, move || async move {
            let n = attempts.fetch_add(1, Ordering::SeqCst) + 1;
            if n < 3 { Err(format!("attempt {n} failed")) } else { Ok(n) }
        })
        .await;

        assert_eq!(result, Ok(3));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        assert_eq!(started.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_the_last_retry() {
        let attempts = &AtomicU32::new(0);

        let result: Result<(), &str> = with_retry(LIST_FETCH_RETRIES, RETRY_DELAY, move || async move {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err("down")
        })
        .await;

        assert_eq!(result, Err("down"));
        // tentativa inicial + 3 novas tentativas
        assert_eq!(attempts.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn success_on_first_try_does_not_wait() {
        let started = Instant::now();
        let result: Result<i32, &str> = with_retry(3, RETRY_DELAY, || async { Ok(1) }).await;
        assert_eq!(result, Ok(1));
        assert_eq!(started.elapsed(), Duration::ZERO);
    }
}
