use crate::Service;

pub(super) async fn oneshot<Request, S>(request: Request, service: &S) -> S::Response
where
    S: Service<Request>,
{
    let permit = service.acquire().await;
    S::call(permit, request).await
}
